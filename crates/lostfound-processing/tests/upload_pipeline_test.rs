use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use lostfound_core::UploadConfig;
use lostfound_processing::{
    ImageFormat, UploadCandidate, UploadError, UploadPipeline, UploadValidator, ValidationFailure,
};
use lostfound_storage::{LocalStorage, Storage};
use regex::Regex;
use tempfile::TempDir;

const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut data = JPEG_HEADER.to_vec();
    data.resize(len, 0xAB);
    data
}

async fn setup_pipeline() -> (TempDir, Arc<LocalStorage>, UploadPipeline) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(
        LocalStorage::new(dir.path(), "/media".to_string())
            .await
            .unwrap(),
    );
    let pipeline = UploadPipeline::new(UploadValidator::default(), storage.clone());
    (dir, storage, pipeline)
}

fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += count_files(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}

#[tokio::test]
async fn test_accepts_valid_jpeg_and_stores_bytes() {
    let (dir, storage, pipeline) = setup_pipeline().await;
    let data = jpeg_bytes(1024);

    let accepted = pipeline
        .accept(UploadCandidate::new("cat.jpeg", data.clone()))
        .await
        .unwrap();

    let pattern = Regex::new(r"^items/[0-9a-f-]+\.jpeg$").unwrap();
    assert!(pattern.is_match(&accepted.storage_path));
    assert_eq!(accepted.size_bytes, 1024);
    assert_eq!(accepted.format, ImageFormat::Jpeg);
    assert_eq!(
        accepted.url.as_deref(),
        Some(format!("/media/{}", accepted.storage_path).as_str())
    );

    assert_eq!(storage.get(&accepted.storage_path).await.unwrap(), data);
    assert_eq!(count_files(dir.path()), 1);
}

#[tokio::test]
async fn test_rejected_extension_writes_nothing() {
    let (dir, _storage, pipeline) = setup_pipeline().await;

    let err = pipeline
        .accept(UploadCandidate::new("malware.exe", jpeg_bytes(1024)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UploadError::Rejected(ValidationFailure::InvalidExtension { .. })
    ));
    assert_eq!(count_files(dir.path()), 0);
}

#[tokio::test]
async fn test_renamed_text_file_is_not_an_image() {
    let (dir, _storage, pipeline) = setup_pipeline().await;

    let err = pipeline
        .accept(UploadCandidate::new(
            "totally-a-photo.png",
            b"#!/bin/sh\necho not an image\n".to_vec(),
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UploadError::Rejected(ValidationFailure::NotAnImage { detected: None })
    ));
    assert_eq!(count_files(dir.path()), 0);
}

#[tokio::test]
async fn test_streamed_upload_over_ceiling_is_rejected() {
    let (dir, storage, _) = setup_pipeline().await;
    let config = UploadConfig {
        max_file_size_bytes: 2048,
        ..Default::default()
    };
    let pipeline = UploadPipeline::new(UploadValidator::new(config.clone()), storage);

    let data = jpeg_bytes(4096);
    let candidate = UploadCandidate::from_reader("big.jpg", None, &data[..], &config)
        .await
        .unwrap();
    let err = pipeline.accept(candidate).await.unwrap_err();
    assert!(matches!(
        err,
        UploadError::Rejected(ValidationFailure::FileTooLarge { max: 2048, .. })
    ));

    let data = jpeg_bytes(2048);
    let candidate = UploadCandidate::from_reader("edge.jpg", Some(2048), &data[..], &config)
        .await
        .unwrap();
    let accepted = pipeline.accept(candidate).await.unwrap();
    assert_eq!(accepted.size_bytes, 2048);
    assert_eq!(count_files(dir.path()), 1);
}

#[tokio::test]
async fn test_upload_cut_short_by_reader_is_not_stored() {
    let (dir, _storage, pipeline) = setup_pipeline().await;
    let reader_config = UploadConfig {
        max_file_size_bytes: 1000,
        ..Default::default()
    };

    let data = jpeg_bytes(10_000);
    let candidate = UploadCandidate::from_reader("cat.jpg", None, &data[..], &reader_config)
        .await
        .unwrap();
    let err = pipeline.accept(candidate).await.unwrap_err();

    assert!(matches!(
        err,
        UploadError::Rejected(ValidationFailure::FileTooLarge { .. })
    ));
    assert_eq!(count_files(dir.path()), 0);
}

#[tokio::test]
async fn test_discard_removes_stored_file() {
    let (_dir, storage, pipeline) = setup_pipeline().await;
    let accepted = pipeline
        .accept(UploadCandidate::new("keys.jpg", jpeg_bytes(64)))
        .await
        .unwrap();

    pipeline.discard(&accepted.storage_path).await.unwrap();
    assert!(!storage.exists(&accepted.storage_path).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_paths() {
    let (dir, _storage, pipeline) = setup_pipeline().await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            pipeline
                .accept(UploadCandidate::new("same-name.png", {
                    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
                    data.push(i as u8);
                    data
                }))
                .await
        }));
    }

    let mut paths = HashSet::new();
    for handle in handles {
        let accepted = handle.await.unwrap().unwrap();
        paths.insert(accepted.storage_path);
    }

    assert_eq!(paths.len(), 32);
    assert_eq!(count_files(dir.path()), 32);
}
