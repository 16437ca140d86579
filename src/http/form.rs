//! Content negotiation for product payloads.
//!
//! `application/json` bodies carry the image as base64; everything else is
//! read as multipart/form-data with the image as a file part. Client-sent
//! uuid or admin id fields are never read.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::product_actor::ProductError;
use crate::product_service::{DeleteOverrides, ProductForm};
use crate::upload::ImageUpload;

/// Multipart field names accepted for the image part.
const IMAGE_FIELDS: &[&str] = &["image_url", "image"];

pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}

#[derive(Debug, Deserialize)]
struct JsonProductForm {
    name: Option<String>,
    #[serde(alias = "image")]
    image_url: Option<JsonImage>,
}

#[derive(Debug, Deserialize)]
struct JsonImage {
    filename: String,
    /// Base64 (standard alphabet, padded) image bytes.
    data: String,
}

/// A product form parsed from either JSON or multipart.
#[derive(Debug)]
pub struct ProductPayload(pub ProductForm);

impl FromRequest<AppState> for ProductPayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let form = if is_json(req.headers()) {
            from_json(req, state).await
        } else {
            from_multipart(req, state).await
        };
        form.map(ProductPayload).map_err(|err| state.reject(err))
    }
}

async fn from_json(req: Request, state: &AppState) -> Result<ProductForm, ProductError> {
    let Json(body) = Json::<JsonProductForm>::from_request(req, state)
        .await
        .map_err(|e| ProductError::InvalidBody(e.body_text()))?;

    let image = body
        .image_url
        .map(|image| {
            STANDARD
                .decode(image.data.trim())
                .map(|content| ImageUpload::new(image.filename, content))
                .map_err(|e| ProductError::InvalidBody(format!("image data is not base64: {e}")))
        })
        .transpose()?;

    Ok(ProductForm {
        name: body.name,
        image,
    })
}

async fn from_multipart(req: Request, state: &AppState) -> Result<ProductForm, ProductError> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| ProductError::InvalidBody(e.body_text()))?;

    let mut form = ProductForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProductError::InvalidBody(e.body_text()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name == "name" {
            let name = field
                .text()
                .await
                .map_err(|e| ProductError::InvalidBody(e.body_text()))?;
            form.name = Some(name);
        } else if IMAGE_FIELDS.contains(&field_name.as_str()) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| ProductError::InvalidBody(e.body_text()))?;
            form.image = Some(ImageUpload::new(filename, content));
        }
    }
    Ok(form)
}

/// Reads the optional JSON narrowing of a delete. Empty or non-JSON bodies mean none.
pub fn delete_overrides(headers: &HeaderMap, body: &Bytes) -> Result<DeleteOverrides, ProductError> {
    if body.is_empty() || !is_json(headers) {
        return Ok(DeleteOverrides::default());
    }
    serde_json::from_slice(body).map_err(|e| ProductError::InvalidBody(e.to_string()))
}
