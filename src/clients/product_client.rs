use tracing::{debug, instrument};
use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductFilter, ProductPatch};
use crate::product_actor::ProductError;

/// Client for interacting with the Product store actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

crate::impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, payload), fields(admin_id = %payload.admin_id))]
    pub async fn create_product(&self, payload: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(payload).await.map_err(ProductError::from)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn delete_products(&self, filter: ProductFilter) -> Result<usize, ProductError> {
        debug!("Sending request");
        self.inner.delete(filter).await.map_err(ProductError::from)
    }
}
