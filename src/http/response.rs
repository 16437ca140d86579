use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clap::ValueEnum;
use serde::Serialize;

use crate::actor_framework::StoreError;
use crate::product_actor::ProductError;

/// How failures are mapped to HTTP status codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusPolicy {
    /// Every failure is a 400, whatever the cause.
    #[default]
    Uniform,
    /// Validation 400, claims 401, ownership 403, missing rows 404,
    /// upload 502, store 500.
    Typed,
}

impl StatusPolicy {
    pub fn status_for(self, err: &ProductError) -> StatusCode {
        match self {
            StatusPolicy::Uniform => StatusCode::BAD_REQUEST,
            StatusPolicy::Typed => typed_status(err),
        }
    }

    pub fn reject(self, err: ProductError) -> ApiError {
        ApiError {
            status: self.status_for(&err),
            message: err.to_string(),
        }
    }
}

fn typed_status(err: &ProductError) -> StatusCode {
    match err {
        ProductError::MissingName
        | ProductError::MissingImage
        | ProductError::ImageTooLarge { .. }
        | ProductError::UnsupportedExtension { .. }
        | ProductError::InvalidBody(_)
        | ProductError::Store(StoreError::Rejected(_)) => StatusCode::BAD_REQUEST,
        ProductError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        ProductError::Forbidden(_) => StatusCode::FORBIDDEN,
        ProductError::NotFound(_) => StatusCode::NOT_FOUND,
        ProductError::Upload(_) => StatusCode::BAD_GATEWAY,
        ProductError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T: Serialize> IntoResponse for Data<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
    pub deleted: usize,
}

impl Deleted {
    pub fn new(deleted: usize) -> Self {
        Self {
            message: "Successfully deleted record.",
            deleted,
        }
    }
}

impl IntoResponse for Deleted {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Failure envelope: `{"error": <status reason>, "message": <cause>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self.status {
            StatusCode::BAD_REQUEST => "Bad request",
            other => other.canonical_reason().unwrap_or("Error"),
        };
        let body = ErrorBody {
            error,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
