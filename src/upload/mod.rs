//! Upload Service seam: stores image bytes and hands back a retrievable location.

mod local;

pub use local::LocalUploader;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

/// An image received from the client, before any policy check.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub filename: String,
    pub content: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UploadError {
    #[error("invalid upload key: {0:?}")]
    InvalidKey(String),
    #[error("location {0} was not issued by this uploader")]
    UnknownLocation(String),
    #[error("failed to store {key}: {message}")]
    Io { key: String, message: String },
}

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Stores `image` under `base_name` and returns its public location.
    async fn upload(&self, image: &ImageUpload, base_name: &str) -> Result<String, UploadError>;

    /// Removes a previously uploaded file.
    async fn discard(&self, location: &str) -> Result<(), UploadError>;
}
