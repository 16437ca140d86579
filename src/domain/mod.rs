pub mod admin;
pub mod product;

pub use admin::*;
pub use product::*;
