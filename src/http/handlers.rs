use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use super::form::{delete_overrides, ProductPayload};
use super::response::{Data, Deleted};
use super::{AdminIdentity, ApiError, AppState};
use crate::domain::Product;

pub async fn create_product(
    State(state): State<AppState>,
    AdminIdentity(caller): AdminIdentity,
    ProductPayload(form): ProductPayload,
) -> Result<Data<Product>, ApiError> {
    let product = state
        .service
        .create(caller, form)
        .await
        .map_err(|e| state.reject(e))?;
    Ok(Data { data: product })
}

pub async fn list_products(State(state): State<AppState>) -> Result<Data<Vec<Product>>, ApiError> {
    let products = state.service.list().await.map_err(|e| state.reject(e))?;
    Ok(Data { data: products })
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_uuid): Path<String>,
) -> Result<Data<Product>, ApiError> {
    let product = state
        .service
        .get(&product_uuid)
        .await
        .map_err(|e| state.reject(e))?;
    Ok(Data { data: product })
}

pub async fn update_product(
    State(state): State<AppState>,
    AdminIdentity(caller): AdminIdentity,
    Path(product_uuid): Path<String>,
    ProductPayload(form): ProductPayload,
) -> Result<Data<Product>, ApiError> {
    let product = state
        .service
        .update(caller, &product_uuid, form)
        .await
        .map_err(|e| state.reject(e))?;
    Ok(Data { data: product })
}

pub async fn delete_product(
    State(state): State<AppState>,
    AdminIdentity(caller): AdminIdentity,
    Path(product_uuid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Deleted, ApiError> {
    let overrides = delete_overrides(&headers, &body).map_err(|e| state.reject(e))?;
    let deleted = state
        .service
        .delete(caller, &product_uuid, overrides)
        .await
        .map_err(|e| state.reject(e))?;
    Ok(Deleted::new(deleted))
}
