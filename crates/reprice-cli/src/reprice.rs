//! The read-compute-write pass over a store catalog.
//!
//! Pages are walked in server order. For every variant the inventory cost is
//! looked up, a price is computed, and the price is written back, one remote
//! call at a time. Page failures abort the run; everything that goes wrong
//! for a single variant is logged and counted, and the run moves on.

use reprice_core::{validate_cost, PricePolicy, WeightBand};
use reprice_shopify::{CatalogApi, PageCursor, Product, ShopifyError, Variant, WriteThrottle};

/// Ceiling on pages per run, in case the server keeps handing out cursors.
pub(crate) const MAX_PAGES: usize = 10_000;

/// Counts for one completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub pages: usize,
    pub variants: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum VariantOutcome {
    Updated,
    Skipped,
    Failed,
}

/// Reprices every variant in the catalog.
///
/// # Errors
///
/// Returns the first error from fetching a catalog page, or
/// [`ShopifyError::PaginationLimit`] past [`MAX_PAGES`]. Per-variant cost and
/// write failures are not errors; they are counted in [`RunSummary::failed`].
pub(crate) async fn run_repricing<A: CatalogApi>(
    api: &A,
    policy: &PricePolicy,
    throttle: &WriteThrottle,
) -> Result<RunSummary, ShopifyError> {
    run_repricing_with_page_limit(api, policy, throttle, MAX_PAGES).await
}

async fn run_repricing_with_page_limit<A: CatalogApi>(
    api: &A,
    policy: &PricePolicy,
    throttle: &WriteThrottle,
    max_pages: usize,
) -> Result<RunSummary, ShopifyError> {
    let mut summary = RunSummary::default();
    let mut cursor: Option<PageCursor> = None;

    loop {
        if summary.pages >= max_pages {
            return Err(ShopifyError::PaginationLimit { max_pages });
        }

        let page = api.next_page(cursor.as_ref()).await?;
        summary.pages += 1;
        tracing::info!(
            page = summary.pages,
            products = page.products.len(),
            "fetched catalog page"
        );

        for product in &page.products {
            for variant in &product.variants {
                summary.variants += 1;
                match reprice_variant(api, policy, throttle, product, variant).await {
                    VariantOutcome::Updated => summary.updated += 1,
                    VariantOutcome::Skipped => summary.skipped += 1,
                    VariantOutcome::Failed => summary.failed += 1,
                }
            }
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(summary)
}

async fn reprice_variant<A: CatalogApi>(
    api: &A,
    policy: &PricePolicy,
    throttle: &WriteThrottle,
    product: &Product,
    variant: &Variant,
) -> VariantOutcome {
    let variant_id = variant.id;
    let product_id = product.id;

    let Some(inventory_item_id) = variant.inventory_item_id else {
        tracing::warn!(
            variant_id,
            product_id,
            "skipping variant: no inventory item, so no valid cost"
        );
        return VariantOutcome::Skipped;
    };

    let raw_cost = match api.inventory_cost(inventory_item_id).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(
                variant_id,
                product_id,
                inventory_item_id,
                error = %e,
                "cost lookup failed"
            );
            return VariantOutcome::Failed;
        }
    };

    let cost = match validate_cost(raw_cost.as_deref()) {
        Ok(cost) => cost,
        Err(reason) => {
            tracing::warn!(
                variant_id,
                product_id,
                inventory_item_id,
                %reason,
                "skipping variant: no valid cost"
            );
            return VariantOutcome::Skipped;
        }
    };

    if variant.weight.is_none() {
        tracing::warn!(variant_id, product_id, "variant has no weight; pricing in heavy band");
    }
    let band = WeightBand::for_optional_weight(variant.weight);
    let Some(new_price) = policy.price_in_band(cost, band) else {
        tracing::warn!(
            variant_id,
            product_id,
            %cost,
            %band,
            "skipping variant: price out of range for cost"
        );
        return VariantOutcome::Skipped;
    };

    tracing::info!(
        variant_id,
        product_id,
        product_title = product.title.as_deref().unwrap_or(""),
        %cost,
        weight_grams = ?variant.weight,
        %band,
        old_price = ?variant.price,
        %new_price,
        "updating variant price"
    );

    match api.update_variant_price(variant_id, new_price).await {
        Ok(()) => {
            throttle.pause().await;
            VariantOutcome::Updated
        }
        Err(e) => {
            tracing::error!(
                variant_id,
                product_id,
                %new_price,
                error = %e,
                "price update failed"
            );
            VariantOutcome::Failed
        }
    }
}

#[cfg(test)]
#[path = "reprice_test.rs"]
mod tests;
