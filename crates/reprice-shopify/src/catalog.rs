//! The remote catalog as seen by the repricer.
//!
//! [`CatalogApi`] is the seam between the run loop and the Admin API. The
//! production implementation is [`crate::AdminClient`]; tests substitute an
//! in-memory catalog.

use std::future::Future;

use rust_decimal::Decimal;

use crate::error::ShopifyError;
use crate::pagination::PageCursor;
use crate::types::Product;

/// Page size requested from the listing endpoint.
pub const PAGE_SIZE: u32 = 50;

/// One page of the catalog listing.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    /// Cursor for the following page, `None` once the catalog is exhausted.
    pub next_cursor: Option<PageCursor>,
}

/// Read and write access to a store catalog.
pub trait CatalogApi {
    /// Fetches one catalog page. `None` requests the first page.
    fn next_page(
        &self,
        cursor: Option<&PageCursor>,
    ) -> impl Future<Output = Result<CatalogPage, ShopifyError>> + Send;

    /// Fetches the raw wholesale cost recorded on an inventory item.
    ///
    /// `Ok(None)` means the item exists but has no cost set.
    fn inventory_cost(
        &self,
        inventory_item_id: i64,
    ) -> impl Future<Output = Result<Option<String>, ShopifyError>> + Send;

    /// Sets the price of one variant, leaving its other fields untouched.
    fn update_variant_price(
        &self,
        variant_id: i64,
        price: Decimal,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send;
}
