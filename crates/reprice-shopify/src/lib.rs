pub mod catalog;
pub mod client;
pub mod error;
pub mod pagination;
pub mod rate_limit;
pub mod types;

pub use catalog::{CatalogApi, CatalogPage};
pub use client::AdminClient;
pub use error::ShopifyError;
pub use pagination::PageCursor;
pub use rate_limit::WriteThrottle;
pub use types::{Product, Variant};
