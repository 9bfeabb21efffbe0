//! Lost & Found Storage Library
//!
//! Storage abstraction for accepted item photos and its local filesystem backend.
//!
//! # Storage path format
//!
//! Every accepted upload is stored at `{subdirectory}/{uuid}.{extension}`, where the
//! UUID is freshly generated per upload and the extension is the lower-cased suffix
//! of the uploader's filename. The original filename never reaches the storage layer.
//! Path generation lives in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{file_extension, generate_storage_path};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use lostfound_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
