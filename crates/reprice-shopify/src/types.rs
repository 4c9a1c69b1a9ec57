//! Admin REST API payloads used by the repricer.
//!
//! Only the fields the repricer reads are modelled; serde ignores the rest.
//!
//! ### Decimal fields
//! `price` arrives as a decimal string (`"12.99"`) while `weight` arrives as
//! a JSON number (`4.9`). `rust_decimal` deserializes both shapes, so each is
//! modelled as `Option<Decimal>`.
//!
//! ### `cost`
//! `inventory_item.cost` is a decimal string or explicit `null` when no cost
//! has been entered. It is kept as the raw string so the pricing layer can
//! tell a missing cost from a malformed one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level response from `GET products.json`.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// A catalog product and its variants.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A purchasable variant of a [`Product`].
#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    pub id: i64,

    /// Cost-tracking record for this variant. Absent on some legacy variants.
    #[serde(default)]
    pub inventory_item_id: Option<i64>,

    /// Shipping weight in grams.
    #[serde(default)]
    pub weight: Option<Decimal>,

    /// Current sale price.
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Response from `GET inventory_items/{id}.json`.
#[derive(Debug, Deserialize)]
pub struct InventoryItemResponse {
    pub inventory_item: InventoryItem,
}

#[derive(Debug, Deserialize)]
pub struct InventoryItem {
    /// Wholesale cost as a decimal string, or `null` when unset.
    #[serde(default, deserialize_with = "cost_as_string")]
    pub cost: Option<String>,
}

/// Request body for `PUT variants/{id}.json`. Only `id` and `price` are sent.
#[derive(Debug, Serialize)]
pub struct VariantPriceUpdate {
    pub variant: VariantPricePayload,
}

#[derive(Debug, Serialize)]
pub struct VariantPricePayload {
    pub id: i64,
    /// Price with exactly two decimal places, e.g. `"23.00"`.
    pub price: String,
}

impl VariantPriceUpdate {
    #[must_use]
    pub fn new(variant_id: i64, price: Decimal) -> Self {
        Self {
            variant: VariantPricePayload {
                id: variant_id,
                price: format!("{price:.2}"),
            },
        }
    }
}

/// Accepts `cost` as a string, a bare number, or `null`.
///
/// Some API versions and proxies emit the cost as a JSON number; it is
/// normalized to its textual form so validation sees one shape.
fn cost_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
