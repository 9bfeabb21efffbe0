//! Storage path generation.
//!
//! Path format: `{subdirectory}/{uuid}.{extension}`.

use uuid::Uuid;

/// Lower-cased text after the final `.` of `filename`.
///
/// A name without a dot yields the whole name, lower-cased.
pub fn file_extension(filename: &str) -> String {
    filename.rsplit('.').next().unwrap_or("").to_lowercase()
}

/// Derive a fresh storage path for an upload named `original_name`.
///
/// The identifier is a random v4 UUID, so two calls never share a path except with
/// negligible probability. Existing storage is not consulted.
pub fn generate_storage_path(subdirectory: &str, original_name: &str) -> String {
    let extension = file_extension(original_name);
    let id = Uuid::new_v4();
    format!(
        "{}/{}.{}",
        subdirectory.trim_end_matches('/'),
        id.hyphenated(),
        extension
    )
}
