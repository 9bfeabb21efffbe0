//! Configuration module
//!
//! Upload limits, storage location and catalog paging. Every value has a
//! default so a bare environment yields a working local setup.

use std::env;

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_UPLOAD_SUBDIRECTORY, ITEMS_PER_PAGE, MAX_FILE_SIZE_MB,
    SNIFF_PREFIX_LEN,
};
use crate::storage_types::StorageBackend;

const DEFAULT_LOCAL_STORAGE_PATH: &str = "./media";
const DEFAULT_LOCAL_STORAGE_BASE_URL: &str = "/media";

/// Limits applied to uploaded item photos.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    /// Lower-case extensions without the leading dot
    pub allowed_extensions: Vec<String>,
    pub max_file_size_bytes: usize,
    /// Storage subdirectory that prefixes every generated path
    pub subdirectory: String,
    pub sniff_prefix_len: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            subdirectory: DEFAULT_UPLOAD_SUBDIRECTORY.to_string(),
            sniff_prefix_len: SNIFF_PREFIX_LEN,
        }
    }
}

impl UploadConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_extensions.is_empty()
            || self.allowed_extensions.iter().any(|e| e.is_empty())
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS must contain at least one non-empty extension"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        let subdir = self.subdirectory.trim();
        if subdir.is_empty() || subdir.starts_with('/') || subdir.contains("..") {
            return Err(anyhow::anyhow!(
                "UPLOAD_SUBDIRECTORY must be a non-empty relative path without '..'"
            ));
        }

        if self.sniff_prefix_len < 12 {
            return Err(anyhow::anyhow!(
                "Sniff prefix must be at least 12 bytes to recognise WebP"
            ));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub upload: UploadConfig,
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub items_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload: UploadConfig::default(),
            storage_backend: StorageBackend::Local,
            local_storage_path: DEFAULT_LOCAL_STORAGE_PATH.to_string(),
            local_storage_base_url: DEFAULT_LOCAL_STORAGE_BASE_URL.to_string(),
            items_per_page: ITEMS_PER_PAGE,
        }
    }
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let allowed_extensions = lookup("ALLOWED_EXTENSIONS")
            .map(|s| {
                s.split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.upload.allowed_extensions);

        let max_file_size_mb = match lookup("MAX_FILE_SIZE_MB") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a whole number"))?,
            None => MAX_FILE_SIZE_MB,
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => defaults.storage_backend,
        };

        let items_per_page = match lookup("ITEMS_PER_PAGE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("ITEMS_PER_PAGE must be a whole number"))?,
            None => defaults.items_per_page,
        };

        let config = Config {
            upload: UploadConfig {
                allowed_extensions,
                max_file_size_bytes: max_file_size_mb * 1024 * 1024,
                subdirectory: lookup("UPLOAD_SUBDIRECTORY")
                    .map(|s| s.trim().trim_end_matches('/').to_string())
                    .unwrap_or(defaults.upload.subdirectory),
                sniff_prefix_len: defaults.upload.sniff_prefix_len,
            },
            storage_backend,
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .unwrap_or(defaults.local_storage_path),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL")
                .unwrap_or(defaults.local_storage_base_url),
            items_per_page,
        };

        config.validate()?;

        tracing::debug!(
            allowed_extensions = ?config.upload.allowed_extensions,
            max_file_size_bytes = config.upload.max_file_size_bytes,
            storage_backend = %config.storage_backend,
            "Configuration loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.upload.validate()?;

        if self.items_per_page == 0 {
            return Err(anyhow::anyhow!("ITEMS_PER_PAGE must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::Local => {
                if self.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn upload(&self) -> &UploadConfig {
        &self.upload
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.upload.max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.upload.allowed_extensions
    }

    pub fn local_storage_path(&self) -> &str {
        &self.local_storage_path
    }

    pub fn local_storage_base_url(&self) -> &str {
        &self.local_storage_base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.allowed_extensions(), &["jpg", "jpeg", "png", "webp"]);
        assert_eq!(config.max_file_size_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.upload.subdirectory, "items");
        assert_eq!(config.items_per_page, 9);
        assert_eq!(config.storage_backend, StorageBackend::Local);
    }

    #[test]
    fn test_overrides_are_normalised() {
        let config = Config::from_lookup(lookup_from(&[
            ("ALLOWED_EXTENSIONS", " PNG, .Gif ,,"),
            ("MAX_FILE_SIZE_MB", "2"),
            ("UPLOAD_SUBDIRECTORY", "photos/"),
        ]))
        .unwrap();

        assert_eq!(config.allowed_extensions(), &["png", "gif"]);
        assert_eq!(config.max_file_size_bytes(), 2 * 1024 * 1024);
        assert_eq!(config.upload.subdirectory, "photos");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[("MAX_FILE_SIZE_MB", "five")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("MAX_FILE_SIZE_MB", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ALLOWED_EXTENSIONS", " , ")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("UPLOAD_SUBDIRECTORY", "../up")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("UPLOAD_SUBDIRECTORY", "/abs")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "s3")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ITEMS_PER_PAGE", "0")])).is_err());
    }
}
