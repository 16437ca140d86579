//! System orchestration, startup, and shutdown logic.

pub mod product_system;
pub mod tracing;

pub use product_system::*;
pub use self::tracing::*;
