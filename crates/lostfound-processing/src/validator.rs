use std::sync::Arc;

use lostfound_core::{AppError, UploadConfig};
use lostfound_storage::{file_extension, generate_storage_path};

use crate::sniff::{ContentSniffer, ImageFormat, SignatureSniffer};
use crate::upload::{AcceptedUpload, UploadCandidate};

/// Reasons an upload is refused. All are final: the user has to pick another file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("Only {} images are allowed.", list_upper(.allowed))]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("File size cannot exceed {}.", human_size(.max))]
    FileTooLarge { size: u64, max: u64 },

    #[error("Uploaded file is not a valid image.")]
    NotAnImage { detected: Option<ImageFormat> },
}

fn list_upper(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

fn human_size(bytes: &u64) -> String {
    let bytes = *bytes;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl From<ValidationFailure> for AppError {
    fn from(err: ValidationFailure) -> Self {
        match err {
            ValidationFailure::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            _ => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Upload validator for item photos
///
/// Runs the extension, size and content checks and derives the storage path of an
/// accepted upload. Holds no mutable state and may be shared across requests.
#[derive(Clone)]
pub struct UploadValidator {
    config: UploadConfig,
    sniffer: Arc<dyn ContentSniffer>,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(UploadConfig::default())
    }
}

impl UploadValidator {
    /// Validator using the built-in signature table
    pub fn new(config: UploadConfig) -> Self {
        Self::with_sniffer(config, Arc::new(SignatureSniffer::default()))
    }

    pub fn with_sniffer(config: UploadConfig, sniffer: Arc<dyn ContentSniffer>) -> Self {
        Self { config, sniffer }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Check the filename's extension against the allow-list (case-insensitive).
    pub fn validate_extension(
        &self,
        candidate: &UploadCandidate,
    ) -> Result<(), ValidationFailure> {
        let extension = file_extension(candidate.original_name());

        if !self.config.allowed_extensions.contains(&extension) {
            return Err(ValidationFailure::InvalidExtension {
                extension,
                allowed: self.config.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Check the size ceiling. Exactly the ceiling is accepted.
    ///
    /// A candidate whose read was cut off is refused even when it was read against a
    /// lower ceiling than this validator's, since its content is incomplete.
    pub fn validate_size(&self, candidate: &UploadCandidate) -> Result<(), ValidationFailure> {
        let max = self.config.max_file_size_bytes as u64;
        if candidate.size_bytes() > max || candidate.is_truncated() {
            return Err(ValidationFailure::FileTooLarge {
                size: candidate.size_bytes(),
                max,
            });
        }
        Ok(())
    }

    /// Sniff the leading bytes and require an allowed image format.
    ///
    /// Only the first `sniff_prefix_len` bytes are inspected. The claimed name plays no part.
    pub fn validate_content(
        &self,
        candidate: &UploadCandidate,
    ) -> Result<ImageFormat, ValidationFailure> {
        let content = candidate.content();
        let prefix = &content[..content.len().min(self.config.sniff_prefix_len)];

        match self.sniffer.sniff(prefix) {
            Some(format) if format.is_allowed_by(&self.config.allowed_extensions) => Ok(format),
            detected => Err(ValidationFailure::NotAnImage { detected }),
        }
    }

    /// Run every check, cheapest first, and surface the first failure.
    pub fn validate(&self, candidate: &UploadCandidate) -> Result<ImageFormat, ValidationFailure> {
        self.validate_extension(candidate)?;
        self.validate_size(candidate)?;
        self.validate_content(candidate)
    }

    /// Run every check and collect all failures instead of stopping at the first.
    pub fn validate_all(
        &self,
        candidate: &UploadCandidate,
    ) -> Result<ImageFormat, Vec<ValidationFailure>> {
        let mut failures = Vec::new();

        if let Err(e) = self.validate_extension(candidate) {
            failures.push(e);
        }
        if let Err(e) = self.validate_size(candidate) {
            failures.push(e);
        }
        // Oversized uploads keep at least the sniff prefix, so the content check still applies
        match self.validate_content(candidate) {
            Ok(format) if failures.is_empty() => Ok(format),
            Ok(_) => Err(failures),
            Err(e) => {
                failures.push(e);
                Err(failures)
            }
        }
    }

    /// Validate a candidate and derive where it will be stored.
    ///
    /// Nothing is written; see [`crate::UploadPipeline`] for validate-then-store.
    pub fn accept(&self, candidate: &UploadCandidate) -> Result<AcceptedUpload, ValidationFailure> {
        let format = match self.validate(candidate) {
            Ok(format) => format,
            Err(failure) => {
                tracing::debug!(
                    error = %failure,
                    size_bytes = candidate.size_bytes(),
                    "Upload rejected"
                );
                return Err(failure);
            }
        };

        let storage_path =
            generate_storage_path(&self.config.subdirectory, candidate.original_name());

        Ok(AcceptedUpload {
            storage_path,
            size_bytes: candidate.size_bytes(),
            format,
            content_type: format.mime_type().to_string(),
            url: None,
        })
    }
}
