//! Helpers shared by the `lostfound` command-line tool.

use std::path::Path;

use anyhow::Context;
use lostfound_core::UploadConfig;
use lostfound_db::{MemoryStore, Seed};
use lostfound_processing::{ImageFormat, UploadCandidate, UploadValidator};
use serde::Serialize;

/// Outcome of checking one file against the upload rules.
#[derive(Debug, Serialize)]
pub struct CheckVerdict {
    pub file: String,
    pub accepted: bool,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Read `path` as an upload, buffering no more than the ceiling allows.
pub async fn read_candidate(
    path: &Path,
    config: &UploadConfig,
) -> anyhow::Result<UploadCandidate> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let declared = file.metadata().await.ok().map(|m| m.len());

    UploadCandidate::from_reader(name, declared, file, config)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Run every rule against `candidate` and report all failures.
pub fn check(validator: &UploadValidator, candidate: &UploadCandidate) -> CheckVerdict {
    let (format, errors) = match validator.validate_all(candidate) {
        Ok(format) => (Some(format), Vec::new()),
        Err(failures) => (None, failures.iter().map(ToString::to_string).collect()),
    };

    CheckVerdict {
        file: candidate.original_name().to_string(),
        accepted: errors.is_empty(),
        size_bytes: candidate.size_bytes(),
        format,
        errors,
    }
}

/// Load a JSON seed file into a fresh in-memory catalog.
pub fn load_seed(path: &Path) -> anyhow::Result<MemoryStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let seed: Seed = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid seed file {}", path.display()))?;
    Ok(MemoryStore::from_seed(seed)?)
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays valid JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
