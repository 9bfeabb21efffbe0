//! Lost & Found Core Library
//!
//! This crate provides the domain models, error types, configuration and form
//! validation shared by every lost-and-found component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
