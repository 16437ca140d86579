use crate::domain::AdminId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product listed by an administrator.
///
/// This struct implements the [`Entity`](crate::actor_framework::Entity) trait,
/// so the rows live inside a [`ResourceActor`](crate::actor_framework::ResourceActor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub uuid: String,
    pub name: String,
    pub image_url: String,
    pub admin_id: AdminId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a new product row. The uuid is assigned by the store.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub image_url: String,
    pub admin_id: AdminId,
}

/// Partial update. `None` and empty strings leave the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub admin_id: Option<AdminId>,
}

/// Exact-match conditions for deleting products. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub uuid: Option<String>,
    pub admin_id: Option<AdminId>,
    pub name: Option<String>,
}

impl ProductFilter {
    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            ..Self::default()
        }
    }
}
