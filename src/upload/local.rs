use super::{ImageUpload, UploadError, Uploader};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Uploader writing images into a local directory.
///
/// Files are keyed by the final segment of the base name, so a later upload
/// with the same name replaces the earlier file.
#[derive(Debug, Clone)]
pub struct LocalUploader {
    root: PathBuf,
    public_base_url: String,
}

impl LocalUploader {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_for(base_name: &str) -> Result<&str, UploadError> {
        let key = base_name.rsplit(['/', '\\']).next().unwrap_or_default();
        if key.is_empty() || key == "." || key == ".." {
            return Err(UploadError::InvalidKey(base_name.to_string()));
        }
        Ok(key)
    }

    fn location_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn io_error(key: &str, err: std::io::Error) -> UploadError {
        UploadError::Io {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Uploader for LocalUploader {
    #[instrument(skip(self, image), fields(filename = %image.filename, size = image.size()))]
    async fn upload(&self, image: &ImageUpload, base_name: &str) -> Result<String, UploadError> {
        let key = Self::key_for(base_name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Self::io_error(key, e))?;
        tokio::fs::write(self.root.join(key), &image.content)
            .await
            .map_err(|e| Self::io_error(key, e))?;

        let location = self.location_for(key);
        debug!(%location, "Image stored");
        Ok(location)
    }

    #[instrument(skip(self))]
    async fn discard(&self, location: &str) -> Result<(), UploadError> {
        let key = location
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| UploadError::UnknownLocation(location.to_string()))?;
        let key = Self::key_for(key)?;
        tokio::fs::remove_file(self.root.join(key))
            .await
            .map_err(|e| Self::io_error(key, e))
    }
}
