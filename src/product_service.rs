//! Orchestrates validation, upload and persistence for the product endpoints.
//!
//! Every mutating operation is a single linear pass:
//! size check → extension check → strip extension → upload → store.
//! Policy violations stop the pass before any I/O; a store failure after a
//! successful upload discards the uploaded file again, unless a stored
//! product still points at it.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::clients::ProductClient;
use crate::domain::{AdminId, Product, ProductCreate, ProductFilter, ProductPatch};
use crate::product_actor::ProductError;
use crate::upload::{ImageUpload, Uploader};
use crate::validation::{is_valid_image_extension, is_valid_image_size, remove_extension};

/// Client-supplied fields for create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Optional narrowing sent in a delete request body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeleteOverrides {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct ProductService {
    products: ProductClient,
    uploader: Arc<dyn Uploader>,
    enforce_ownership: bool,
}

impl ProductService {
    pub fn new(products: ProductClient, uploader: Arc<dyn Uploader>) -> Self {
        Self {
            products,
            uploader,
            enforce_ownership: false,
        }
    }

    /// Restricts update and delete to the admin that owns the product.
    pub fn with_ownership_checks(mut self, enforce: bool) -> Self {
        self.enforce_ownership = enforce;
        self
    }

    #[instrument(skip(self, form), fields(admin_id = %caller))]
    pub async fn create(&self, caller: AdminId, form: ProductForm) -> Result<Product, ProductError> {
        info!("Processing create_product request");
        let name = form.name.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(ProductError::MissingName);
        }
        let image = validate_image(form.image.as_ref())?;
        let image_url = self.upload(image).await?;

        let payload = ProductCreate {
            name,
            image_url: image_url.clone(),
            admin_id: caller,
        };
        match self.products.create_product(payload).await {
            Ok(product) => {
                info!(product_uuid = %product.uuid, "Product created");
                Ok(product)
            }
            Err(e) => Err(self.compensate(&image_url, e).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        self.products.list_products().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, product_uuid: &str) -> Result<Product, ProductError> {
        self.products
            .get_product(product_uuid.to_string())
            .await?
            .ok_or_else(|| ProductError::NotFound(product_uuid.to_string()))
    }

    /// Replaces a product's image and, when given, its name.
    ///
    /// The row is looked up before the image is touched: an unknown uuid
    /// fails without validating or uploading anything. The owner is reset to
    /// the caller.
    #[instrument(skip(self, form), fields(admin_id = %caller))]
    pub async fn update(
        &self,
        caller: AdminId,
        product_uuid: &str,
        form: ProductForm,
    ) -> Result<Product, ProductError> {
        info!("Processing update_product request");
        let existing = self.get(product_uuid).await?;
        if self.enforce_ownership && existing.admin_id != caller {
            warn!(owner = %existing.admin_id, "Update rejected for non-owner");
            return Err(ProductError::Forbidden(existing.uuid));
        }

        let image = validate_image(form.image.as_ref())?;
        let image_url = self.upload(image).await?;

        let patch = ProductPatch {
            name: form.name,
            image_url: Some(image_url.clone()),
            admin_id: Some(caller),
        };
        match self.products.update_product(existing.uuid, patch).await {
            Ok(product) => {
                info!("Product updated");
                Ok(product)
            }
            Err(e) => Err(self.compensate(&image_url, e).await),
        }
    }

    /// Deletes the product with the given uuid and returns how many rows went away.
    ///
    /// Unknown uuids are not an error; they simply delete nothing.
    #[instrument(skip(self), fields(admin_id = %caller))]
    pub async fn delete(
        &self,
        caller: AdminId,
        product_uuid: &str,
        overrides: DeleteOverrides,
    ) -> Result<usize, ProductError> {
        let filter = ProductFilter {
            admin_id: self.enforce_ownership.then_some(caller),
            name: overrides.name,
            ..ProductFilter::by_uuid(product_uuid)
        };
        let deleted = self.products.delete_products(filter).await?;
        info!(deleted, "Processed delete_product request");
        Ok(deleted)
    }

    async fn upload(&self, image: &ImageUpload) -> Result<String, ProductError> {
        let base_name = remove_extension(&image.filename);
        self.uploader.upload(image, base_name).await.map_err(|e| {
            error!(error = %e, "Image upload failed");
            ProductError::from(e)
        })
    }

    // Returns the store error unchanged; a failed discard is only logged.
    // Same-named uploads share a location, so a referenced image is kept.
    async fn compensate(&self, image_url: &str, err: ProductError) -> ProductError {
        error!(error = %err, "Store write failed after upload");
        match self.products.list_products().await {
            Ok(products) if products.iter().any(|p| p.image_url == image_url) => {
                info!(%image_url, "Uploaded image is still referenced, keeping it");
            }
            Ok(_) => {
                if let Err(discard_err) = self.uploader.discard(image_url).await {
                    warn!(error = %discard_err, %image_url, "Orphaned uploaded image");
                }
            }
            Err(list_err) => {
                warn!(error = %list_err, %image_url, "Could not check image references, keeping image");
            }
        }
        err
    }
}

/// Checks presence, then size, then extension, in that order.
fn validate_image(image: Option<&ImageUpload>) -> Result<&ImageUpload, ProductError> {
    let image = image.ok_or(ProductError::MissingImage)?;
    if !is_valid_image_size(image.size()) {
        return Err(ProductError::ImageTooLarge { size: image.size() });
    }
    if !is_valid_image_extension(&image.filename) {
        return Err(ProductError::UnsupportedExtension {
            filename: image.filename.clone(),
        });
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::StoreError;
    use crate::mock_framework::{create_mock_client, expect_create, expect_get, expect_list, expect_update};
    use crate::upload::UploadError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Uploader double that records every call and can be told to fail.
    #[derive(Default)]
    struct RecordingUploader {
        pub uploads: Mutex<Vec<String>>,
        pub discarded: Mutex<Vec<String>>,
        pub fail_with: Option<UploadError>,
    }

    impl RecordingUploader {
        pub fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Uploader for RecordingUploader {
        async fn upload(&self, _image: &ImageUpload, base_name: &str) -> Result<String, UploadError> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.uploads.lock().unwrap().push(base_name.to_string());
            Ok(format!("https://img.test/{base_name}"))
        }

        async fn discard(&self, location: &str) -> Result<(), UploadError> {
            self.discarded.lock().unwrap().push(location.to_string());
            Ok(())
        }
    }

    fn form(name: &str, filename: &str, size: usize) -> ProductForm {
        ProductForm {
            name: Some(name.to_string()),
            image: Some(ImageUpload::new(filename, vec![0u8; size])),
        }
    }

    fn stored(uuid: &str, admin: u64) -> Product {
        Product {
            uuid: uuid.to_string(),
            name: "Lamp".to_string(),
            image_url: "https://img.test/lamp".to_string(),
            admin_id: AdminId::new(admin),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_with(uploader: Arc<RecordingUploader>) -> (
        ProductService,
        tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Product>>,
    ) {
        let (inner, receiver) = create_mock_client::<Product>(10);
        let service = ProductService::new(ProductClient::new(inner), uploader);
        (service, receiver)
    }

    #[tokio::test]
    async fn test_create_uploads_then_inserts() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());

        let task = tokio::spawn(async move {
            service.create(AdminId::new(3), form("Lamp", "lamp.JPG", 1024)).await
        });

        let (payload, responder) = expect_create(&mut store_rx).await.expect("Expected Create");
        assert_eq!(payload.name, "Lamp");
        assert_eq!(payload.image_url, "https://img.test/lamp");
        assert_eq!(payload.admin_id, AdminId::new(3));
        responder.send(Ok(stored("p-1", 3))).unwrap();

        let product = task.await.unwrap().unwrap();
        assert_eq!(product.uuid, "p-1");
        assert_eq!(*uploader.uploads.lock().unwrap(), vec!["lamp".to_string()]);
    }

    #[tokio::test]
    async fn test_create_rejects_oversize_image_before_io() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());

        let err = service
            .create(AdminId::new(1), form("Lamp", "lamp.jpg", 6 * 1024 * 1024))
            .await
            .unwrap_err();

        assert_eq!(err, ProductError::ImageTooLarge { size: 6 * 1024 * 1024 });
        assert_eq!(err.to_string(), "File size should be less than 5MB.");
        assert_eq!(uploader.upload_count(), 0);
        assert!(store_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_gif_before_upload() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());

        let err = service
            .create(AdminId::new(1), form("Lamp", "lamp.gif", 10))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "File extension should be in JPG, JPEG, PNG or SVG.");
        assert_eq!(uploader.upload_count(), 0);
        assert!(store_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_without_image() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, _store_rx) = service_with(uploader);
        let form = ProductForm { name: Some("Lamp".into()), image: None };

        let err = service.create(AdminId::new(1), form).await.unwrap_err();
        assert_eq!(err, ProductError::MissingImage);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_create() {
        let uploader = Arc::new(RecordingUploader {
            fail_with: Some(UploadError::InvalidKey(String::new())),
            ..Default::default()
        });
        let (service, mut store_rx) = service_with(uploader);

        let err = service
            .create(AdminId::new(1), form("Lamp", ".png", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Upload(_)));
        assert!(store_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_before_upload() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());

        let err = service
            .create(AdminId::new(1), form("  ", "lamp.png", 10))
            .await
            .unwrap_err();
        assert_eq!(err, ProductError::MissingName);
        assert_eq!(err.to_string(), "product name is required");
        assert_eq!(uploader.upload_count(), 0);
        assert!(store_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_store_failure_discards_uploaded_image() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());

        let task = tokio::spawn(async move {
            service.create(AdminId::new(1), form("Lamp", "lamp.png", 10)).await
        });
        let (_, responder) = expect_create(&mut store_rx).await.expect("Expected Create");
        responder
            .send(Err(StoreError::Rejected("duplicate product".into())))
            .unwrap();
        let responder = expect_list(&mut store_rx).await.expect("Expected List");
        responder.send(Ok(vec![])).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "duplicate product");
        assert_eq!(*uploader.discarded.lock().unwrap(), vec!["https://img.test/lamp".to_string()]);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_image_another_product_uses() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());

        let task = tokio::spawn(async move {
            service.update(AdminId::new(1), "p-1", form("Lamp", "lamp.png", 10)).await
        });
        let (_, responder) = expect_get(&mut store_rx).await.expect("Expected Get");
        responder.send(Ok(Some(stored("p-1", 1)))).unwrap();
        let (_, _, responder) = expect_update(&mut store_rx).await.expect("Expected Update");
        responder.send(Err(StoreError::NotFound("p-1".into()))).unwrap();
        let responder = expect_list(&mut store_rx).await.expect("Expected List");
        responder.send(Ok(vec![stored("p-2", 2)])).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err, ProductError::NotFound("p-1".into()));
        assert_eq!(uploader.upload_count(), 1);
        assert!(uploader.discarded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_uuid_skips_upload() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());

        let task = tokio::spawn(async move {
            service.update(AdminId::new(1), "missing", form("Lamp", "lamp.png", 10)).await
        });
        let (id, responder) = expect_get(&mut store_rx).await.expect("Expected Get");
        assert_eq!(id, "missing");
        responder.send(Ok(None)).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err, ProductError::NotFound("missing".into()));
        assert_eq!(err.to_string(), "record not found");
        assert_eq!(uploader.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_update_resets_owner_to_caller() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader);

        let task = tokio::spawn(async move {
            service.update(AdminId::new(8), "p-1", form("Desk lamp", "desk.svg", 10)).await
        });
        let (_, responder) = expect_get(&mut store_rx).await.expect("Expected Get");
        responder.send(Ok(Some(stored("p-1", 2)))).unwrap();

        let (id, patch, responder) = expect_update(&mut store_rx).await.expect("Expected Update");
        assert_eq!(id, "p-1");
        assert_eq!(patch.name.as_deref(), Some("Desk lamp"));
        assert_eq!(patch.image_url.as_deref(), Some("https://img.test/desk"));
        assert_eq!(patch.admin_id, Some(AdminId::new(8)));
        let mut updated = stored("p-1", 8);
        updated.name = "Desk lamp".into();
        responder.send(Ok(updated.clone())).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_with_ownership_checks_rejects_other_admins() {
        let uploader = Arc::new(RecordingUploader::default());
        let (service, mut store_rx) = service_with(uploader.clone());
        let service = service.with_ownership_checks(true);

        let task = tokio::spawn(async move {
            service.update(AdminId::new(8), "p-1", form("Lamp", "lamp.png", 10)).await
        });
        let (_, responder) = expect_get(&mut store_rx).await.expect("Expected Get");
        responder.send(Ok(Some(stored("p-1", 2)))).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err, ProductError::Forbidden("p-1".into()));
        assert_eq!(uploader.upload_count(), 0);
    }
}
