//! [`CatalogApi`] over the Admin REST endpoints.

use rust_decimal::Decimal;

use crate::catalog::{CatalogApi, CatalogPage, PAGE_SIZE};
use crate::error::ShopifyError;
use crate::pagination::{extract_next_cursor, PageCursor};
use crate::types::{InventoryItemResponse, ProductsResponse, VariantPriceUpdate};

use super::AdminClient;

impl CatalogApi for AdminClient {
    async fn next_page(&self, cursor: Option<&PageCursor>) -> Result<CatalogPage, ShopifyError> {
        let url = self.products_url(PAGE_SIZE, cursor)?;
        tracing::debug!(%url, "fetching catalog page");

        let response = self
            .send_checked(self.client.get(url.clone()), &url)
            .await?;

        // Read the Link header before the body consumes the response.
        let link_header = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let parsed: ProductsResponse =
            Self::decode(response, &format!("products page {url}")).await?;

        Ok(CatalogPage {
            products: parsed.products,
            next_cursor: extract_next_cursor(link_header.as_deref()),
        })
    }

    async fn inventory_cost(&self, inventory_item_id: i64) -> Result<Option<String>, ShopifyError> {
        let url = self.inventory_item_url(inventory_item_id)?;
        let response = self
            .send_checked(self.client.get(url.clone()), &url)
            .await?;
        let parsed: InventoryItemResponse =
            Self::decode(response, &format!("inventory item {inventory_item_id}")).await?;
        Ok(parsed.inventory_item.cost)
    }

    async fn update_variant_price(&self, variant_id: i64, price: Decimal) -> Result<(), ShopifyError> {
        let url = self.variant_url(variant_id)?;
        let body = VariantPriceUpdate::new(variant_id, price);
        self.send_checked(self.client.put(url.clone()).json(&body), &url)
            .await?;
        Ok(())
    }
}
