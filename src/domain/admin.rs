use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Claim key carrying the administrator's numeric account id.
pub const ADMIN_ID_CLAIM: &str = "id";

/// Identity of the authenticated administrator making a request.
///
/// Parsed once from the upstream claims and then passed explicitly through
/// every service call. Never deserialized from a client payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(u64);

impl AdminId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Reads the admin id out of an untyped claims map.
    ///
    /// Integral floats (`7.0`) and decimal strings (`"7"`) are accepted
    /// alongside plain integers. Anything else is rejected, never truncated.
    pub fn from_claims(claims: &Map<String, Value>) -> Result<Self, ClaimsError> {
        let raw = claims.get(ADMIN_ID_CLAIM).ok_or(ClaimsError::MissingAdminId)?;
        let invalid = || ClaimsError::InvalidAdminId(raw.to_string());

        let id = match raw {
            Value::Number(n) => match (n.as_u64(), n.as_f64()) {
                (Some(id), _) => id,
                (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => f as u64,
                _ => return Err(invalid()),
            },
            Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };
        Ok(Self(id))
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClaimsError {
    #[error("authentication claims are missing")]
    Missing,
    #[error("authentication claims are malformed: {0}")]
    Malformed(String),
    #[error("authentication claims do not carry an admin id")]
    MissingAdminId,
    #[error("admin id claim is not a valid account id: {0}")]
    InvalidAdminId(String),
}
