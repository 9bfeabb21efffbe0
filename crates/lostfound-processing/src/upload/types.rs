//! Types for the upload pipeline.

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use lostfound_core::UploadConfig;
use lostfound_storage::file_extension;

use crate::sniff::ImageFormat;

/// A file awaiting validation. Consumed once; never persisted as-is.
///
/// `size_bytes` always describes the same bytes the content check reads: it is the
/// length of `content`, except when the upload was cut off at the ceiling, in which
/// case `truncated` is set and `size_bytes` exceeds the ceiling it was read against.
#[derive(Clone, Debug)]
pub struct UploadCandidate {
    original_name: String,
    size_bytes: u64,
    content: Vec<u8>,
    truncated: bool,
}

impl UploadCandidate {
    /// Candidate over bytes already in memory
    pub fn new(original_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            size_bytes: content.len() as u64,
            content,
            truncated: false,
        }
    }

    /// Read a candidate from `reader`, buffering at most one byte past the ceiling.
    ///
    /// `declared_size` (e.g. a multipart header or file metadata) lets an oversized
    /// upload be refused after reading only the sniff prefix. It is never trusted as
    /// the accepted size.
    pub async fn from_reader<R>(
        original_name: impl Into<String>,
        declared_size: Option<u64>,
        reader: R,
        config: &UploadConfig,
    ) -> std::io::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let original_name = original_name.into();
        let max_bytes = config.max_file_size_bytes as u64;

        if let Some(declared) = declared_size.filter(|d| *d > max_bytes) {
            tracing::debug!(
                declared_size = declared,
                max_bytes,
                "Reading only the sniff prefix of upload declared larger than ceiling"
            );
            let mut prefix = Vec::new();
            reader
                .take(config.sniff_prefix_len as u64)
                .read_to_end(&mut prefix)
                .await?;
            return Ok(Self {
                original_name,
                size_bytes: declared,
                content: prefix,
                truncated: true,
            });
        }

        let mut content = Vec::new();
        reader.take(max_bytes + 1).read_to_end(&mut content).await?;
        let truncated = content.len() as u64 > max_bytes;

        Ok(Self {
            original_name,
            size_bytes: content.len() as u64,
            content,
            truncated,
        })
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Lower-cased suffix of the original name
    pub fn declared_extension(&self) -> String {
        file_extension(&self.original_name)
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Whether reading stopped at the ceiling, leaving `content` incomplete
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

/// A candidate that passed validation, with the path it is (or will be) stored under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AcceptedUpload {
    pub storage_path: String,
    pub size_bytes: u64,
    /// Format detected from content, not from the name
    pub format: ImageFormat,
    pub content_type: String,
    /// Set once the bytes have been written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
