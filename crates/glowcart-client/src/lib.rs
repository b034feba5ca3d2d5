pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod retry;
pub mod types;

pub use client::CatalogClient;
pub use error::ClientError;
pub use normalize::normalize_product;
pub use types::{WireCollection, WireProduct, WireProductsPage, WireVariant};
