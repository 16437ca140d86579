use crate::actor_framework::StoreError;
use crate::domain::ClaimsError;
use crate::upload::UploadError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("product name is required")]
    MissingName,
    #[error("Image file is required.")]
    MissingImage,
    #[error("File size should be less than 5MB.")]
    ImageTooLarge { size: u64 },
    #[error("File extension should be in JPG, JPEG, PNG or SVG.")]
    UnsupportedExtension { filename: String },
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Unauthenticated(#[from] ClaimsError),
    #[error("product {0} belongs to another admin")]
    Forbidden(String),
    #[error("record not found")]
    NotFound(String),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ProductError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ProductError::NotFound(id),
            other => ProductError::Store(other),
        }
    }
}
