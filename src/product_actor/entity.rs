use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductFilter, ProductPatch};
use chrono::Utc;

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Filter = ProductFilter;

    fn id(&self) -> &String { &self.uuid }

    fn from_create(id: String, payload: ProductCreate) -> Result<Self, String> {
        let now = Utc::now();
        Ok(Self {
            uuid: id,
            name: payload.name,
            image_url: payload.image_url,
            admin_id: payload.admin_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        filter.uuid.as_ref().map_or(true, |uuid| *uuid == self.uuid)
            && filter.admin_id.map_or(true, |admin_id| admin_id == self.admin_id)
            && filter.name.as_ref().map_or(true, |name| *name == self.name)
    }

    /// Rejects rows without a usable name, the store's only column constraint.
    fn on_create(&mut self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name is required".to_string());
        }
        Ok(())
    }

    /// Applies a partial update.
    ///
    /// # Fields Updated
    /// - `name`: only when non-empty
    /// - `image_url`: only when non-empty
    /// - `admin_id`: whenever present
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(name) = patch.name.filter(|name| !name.trim().is_empty()) {
            self.name = name;
        }
        if let Some(image_url) = patch.image_url.filter(|url| !url.is_empty()) {
            self.image_url = image_url;
        }
        if let Some(admin_id) = patch.admin_id {
            self.admin_id = admin_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
