//! File storage collaborator for uploaded resume PDFs.
//!
//! Backends: S3/MinIO (`s3`) or the local filesystem served under `/uploads` (`local`).

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

pub mod local;
pub mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

const MAX_STORED_NAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Backend key, needed to delete the file later.
    pub key: String,
    /// Publicly dereferenceable URL.
    pub url: String,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str)
        -> Result<StoredFile, StorageError>;

    /// Removing a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Deletes stored files whose records are already gone. Failures only leave an
/// orphaned file behind, so they are logged and skipped.
pub async fn discard(files: &dyn FileStorage, keys: impl IntoIterator<Item = String>) {
    for key in keys {
        if key.is_empty() {
            continue;
        }
        if let Err(e) = files.delete(&key).await {
            warn!("Could not delete stored file {key}: {e}");
        }
    }
}

/// Unique storage key for an uploaded resume, keeping a sanitized form of its name.
pub fn object_key(file_name: &str) -> String {
    let mut safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STORED_NAME_LEN)
        .collect();
    if safe.trim_matches(|c| c == '.' || c == '_').is_empty() {
        safe = "resume.pdf".to_string();
    }
    format!("resumes/{}-{safe}", Uuid::new_v4())
}
