use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::http::StatusPolicy;
use crate::validation::MAX_IMAGE_BYTES;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_PUBLIC_BASE_URL: &str = "/uploads";
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_STORE_BUFFER: usize = 32;

#[derive(Debug, Clone, Parser)]
#[command(name = "trade-products", version, about = "Product catalogue endpoints for the trade backend")]
pub struct CliArgs {
    /// Address the HTTP server listens on
    #[arg(long, env = "PRODUCTS_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Directory uploaded product images are written to
    #[arg(long, env = "PRODUCTS_UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    pub upload_dir: PathBuf,

    /// Prefix of the image locations returned to clients
    #[arg(long, env = "PRODUCTS_PUBLIC_BASE_URL", default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    /// Largest accepted request body, multipart envelope included
    #[arg(long, env = "PRODUCTS_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// How failures map to HTTP status codes
    #[arg(long, env = "PRODUCTS_STATUS_CODES", value_enum, default_value_t = StatusPolicy::Uniform)]
    pub status_codes: StatusPolicy,

    /// Only let the owning admin update or delete a product
    #[arg(long, env = "PRODUCTS_ENFORCE_OWNERSHIP", default_value_t = false)]
    pub enforce_ownership: bool,

    /// Capacity of the store actor's request queue
    #[arg(long, env = "PRODUCTS_STORE_BUFFER", default_value_t = DEFAULT_STORE_BUFFER)]
    pub store_buffer: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub max_body_bytes: usize,
    pub status_codes: StatusPolicy,
    pub enforce_ownership: bool,
    pub store_buffer: usize,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            bind,
            upload_dir,
            public_base_url,
            max_body_bytes,
            status_codes,
            enforce_ownership,
            store_buffer,
        } = args;

        // Oversize images must reach the size policy instead of the body limit.
        anyhow::ensure!(
            max_body_bytes as u64 > MAX_IMAGE_BYTES,
            "max body size ({max_body_bytes} bytes) must exceed the {MAX_IMAGE_BYTES} byte image limit"
        );
        anyhow::ensure!(store_buffer > 0, "store buffer must be at least 1");

        let public_base_url = public_base_url.trim().trim_end_matches('/').to_string();
        anyhow::ensure!(
            !public_base_url.is_empty(),
            "public base url must not be empty or '/'"
        );

        Ok(Self {
            bind,
            upload_dir,
            public_base_url,
            max_body_bytes,
            status_codes,
            enforce_ownership,
            store_buffer,
        })
    }
}
