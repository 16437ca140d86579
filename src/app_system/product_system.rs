use std::sync::Arc;

use tracing::{error, info};

use crate::config::ServerConfig;
use crate::http::AppState;
use crate::product_actor;
use crate::product_service::ProductService;
use crate::upload::{LocalUploader, Uploader};

/// The application system: owns the store actor task and the service wired to it.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct ProductSystem {
    pub service: ProductService,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ProductSystem {
    /// Starts the store actor and wires it to the given uploader.
    pub fn new(store_buffer: usize, uploader: Arc<dyn Uploader>, enforce_ownership: bool) -> Self {
        let (product_actor, product_client) = product_actor::new(store_buffer);
        let product_handle = tokio::spawn(product_actor.run());

        let service = ProductService::new(product_client, uploader)
            .with_ownership_checks(enforce_ownership);

        Self {
            service,
            handles: vec![product_handle],
        }
    }

    /// Builds the system described by the server configuration.
    pub async fn from_config(config: &ServerConfig) -> std::io::Result<Self> {
        let uploader = LocalUploader::new(&config.upload_dir, config.public_base_url.clone());
        tokio::fs::create_dir_all(uploader.root()).await?;
        info!(upload_dir = %uploader.root().display(), "Upload directory ready");

        Ok(Self::new(
            config.store_buffer,
            Arc::new(uploader),
            config.enforce_ownership,
        ))
    }

    pub fn state(&self, config: &ServerConfig) -> AppState {
        AppState::new(self.service.clone(), config.status_codes)
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // The store actor stops once every client clone is gone, including
        // the ones captured by the router state.
        drop(self.service);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
