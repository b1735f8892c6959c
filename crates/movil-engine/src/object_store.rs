//! # Object Store Port
//!
//! Voucher images and product photos are binary blobs; the engines never
//! care where they live. This module defines the seam:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PaymentEngine / CatalogEngine                                          │
//! │        │                                                                │
//! │        ▼  store(key, bytes) → public reference (URL or path)            │
//! │  dyn ObjectStore                                                        │
//! │        ├── LocalObjectStore   (filesystem, dev and tests)               │
//! │        └── <cloud adapter>    (lives outside this workspace)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Rule
//! Uploads happen BEFORE the database write that records the reference.
//! If the upload fails the transaction never commits; an orphaned blob
//! (upload succeeded, commit failed) is tolerated and garbage-collected
//! out of band. The reverse (a committed row pointing at a missing blob)
//! is never acceptable.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Object-store failures. Always server-kind at the transport boundary.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("Object upload failed: {0}")]
    Upload(String),

    #[error("Object delete failed: {0}")]
    Delete(String),
}

/// An uploaded file as handed over by the transport adapter.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Client-supplied name, used only as a key suffix.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        FileUpload {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Binary storage collaborator.
///
/// `store` returns the public reference to persist in the database.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes the blob under `key` and returns its public reference.
    async fn store(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, ObjectStoreError>;

    /// Removes a previously stored blob by its public reference.
    ///
    /// Deleting a reference that no longer exists is not an error.
    async fn delete(&self, reference: &str) -> Result<(), ObjectStoreError>;
}

/// Filesystem-backed store for development and tests.
///
/// Keys map to paths under `root`; the returned reference is the absolute
/// path of the written file.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalObjectStore { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn store(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ObjectStoreError::Upload(e.to_string()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ObjectStoreError::Upload(e.to_string()))?;

        debug!(key, size = bytes.len(), "Stored object");

        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, reference: &str) -> Result<(), ObjectStoreError> {
        match tokio::fs::remove_file(reference).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ObjectStoreError::Delete(e.to_string())),
        }
    }
}
