//! Application-wide constants.

/// Image extensions accepted for item photos, lower-case and without the dot.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Upload ceiling in mebibytes. A file of exactly this size is accepted.
pub const MAX_FILE_SIZE_MB: usize = 5;

/// Subdirectory under the storage root where item photos land.
pub const DEFAULT_UPLOAD_SUBDIRECTORY: &str = "items";

/// Number of leading bytes inspected when sniffing an upload's real format.
/// WebP needs 12 (RIFF header + fourcc); the rest is headroom for added signatures.
pub const SNIFF_PREFIX_LEN: usize = 32;

/// Catalog page size.
pub const ITEMS_PER_PAGE: usize = 9;

/// Number of items shown on the home page.
pub const RECENT_ITEMS_LIMIT: usize = 6;

/// Number of claimed/unclaimed items shown on a user's dashboard.
pub const DASHBOARD_ITEMS_LIMIT: usize = 5;
