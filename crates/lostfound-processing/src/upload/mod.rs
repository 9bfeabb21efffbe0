//! Upload pipeline: read → validate → store.

mod pipeline;
mod types;

pub use pipeline::{UploadError, UploadPipeline};
pub use types::{AcceptedUpload, UploadCandidate};
