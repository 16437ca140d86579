//! Product persistence: the product entity hooks and the store actor that owns the rows.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::ResourceActor;
use crate::clients::ProductClient;
use crate::domain::Product;
use uuid::Uuid;

/// Creates a new Product store actor and its client.
///
/// Every row gets a random v4 uuid, so concurrent creates never coordinate on ids.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let next_product_id = || Uuid::new_v4().to_string();

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_product_id);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
