//! Upload collaborator: an opaque "bytes in, id out" blob store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by a [`BlobService`].
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upload service returned an unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Shared document not found: {0}")]
    NotFound(String),

    #[error("Invalid upload service URL: {0}")]
    InvalidUrl(String),
}

/// Remote blob storage used for share-id links.
pub trait BlobService {
    /// Store `bytes` and return the id to fetch them with.
    fn upload(&self, bytes: Vec<u8>) -> impl Future<Output = Result<String, UploadError>> + Send;

    /// Fetch bytes previously stored under `remote_id`.
    fn fetch(&self, remote_id: &str) -> impl Future<Output = Result<Vec<u8>, UploadError>> + Send;
}

/// In-process [`BlobService`] for offline use and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlobService {
    /// Stored blobs keyed by remote id.
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl BlobService for MemoryBlobService {
    async fn upload(&self, bytes: Vec<u8>) -> Result<String, UploadError> {
        let remote_id = format!("{}.transedit", uuid::Uuid::new_v4().simple());
        self.blobs.write().await.insert(remote_id.clone(), bytes);
        Ok(remote_id)
    }

    async fn fetch(&self, remote_id: &str) -> Result<Vec<u8>, UploadError> {
        self.blobs
            .read()
            .await
            .get(remote_id)
            .cloned()
            .ok_or_else(|| UploadError::NotFound(remote_id.to_string()))
    }
}
