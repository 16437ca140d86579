//! Caller identity at the HTTP boundary.
//!
//! Token verification happens upstream. The gateway forwards the verified
//! claims as a JSON object in [`CLAIMS_HEADER`]; [`claims_from_gateway`] lifts
//! them into the request context and [`AdminIdentity`] turns them into a typed
//! [`AdminId`] exactly once per request.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{ApiError, AppState};
use crate::domain::{AdminId, ClaimsError};

pub const CLAIMS_HEADER: &str = "x-auth-claims";

/// Verified claims attached to the request context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims(pub Map<String, Value>);

pub async fn claims_from_gateway(mut req: Request, next: Next) -> Response {
    if let Some(raw) = req.headers().get(CLAIMS_HEADER) {
        match parse_claims(raw) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(err) => {
                warn!(error = %err, "Dropping malformed gateway claims");
                req.extensions_mut().insert(err);
            }
        }
    }
    next.run(req).await
}

fn parse_claims(raw: &HeaderValue) -> Result<Claims, ClaimsError> {
    let text = raw
        .to_str()
        .map_err(|e| ClaimsError::Malformed(e.to_string()))?;
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(Claims(map)),
        Ok(_) => Err(ClaimsError::Malformed("claims must be a JSON object".to_string())),
        Err(e) => Err(ClaimsError::Malformed(e.to_string())),
    }
}

/// The authenticated administrator behind the current request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdminIdentity(pub AdminId);

impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let admin_id = match parts.extensions.get::<Claims>() {
            Some(Claims(claims)) => AdminId::from_claims(claims),
            None => Err(parts
                .extensions
                .get::<ClaimsError>()
                .cloned()
                .unwrap_or(ClaimsError::Missing)),
        };

        match admin_id {
            Ok(admin_id) => {
                debug!(%admin_id, "Caller identified");
                Ok(AdminIdentity(admin_id))
            }
            Err(err) => {
                warn!(error = %err, "Rejecting request without a usable admin identity");
                Err(state.reject(err.into()))
            }
        }
    }
}
