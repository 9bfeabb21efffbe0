//! Lost & Found Processing Library
//!
//! Validation of uploaded item photos and the validate-then-store upload pipeline.
//!
//! A candidate upload passes three independent checks before anything is written:
//! its extension must be on the allow-list, its size must not exceed the ceiling,
//! and its leading bytes must sniff as an allowed image format.

pub mod sniff;
pub mod upload;
pub mod validator;

pub use sniff::{ContentSniffer, ImageFormat, Signature, SignatureSniffer};
#[cfg(feature = "image")]
pub use sniff::ImageCrateSniffer;
pub use upload::{AcceptedUpload, UploadCandidate, UploadError, UploadPipeline};
pub use validator::{UploadValidator, ValidationFailure};
