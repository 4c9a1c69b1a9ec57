//! Cost-plus pricing for catalog variants.
//!
//! A variant's sale price is its wholesale cost times a multiplier plus a
//! flat surcharge. Both terms depend on which weight band the variant falls
//! in. The raw figure is rounded to cents first and then lifted to the next
//! whole currency unit:
//!
//! | band  | weight (g) | raw price         |
//! |-------|------------|-------------------|
//! | light | `< 5`      | `cost × 1.3 + 10` |
//! | heavy | `>= 5`     | `cost × 1.3 + 20` |
//!
//! All arithmetic is exact decimal; no value passes through `f64`.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Weight (grams) at which the heavy band starts. Exactly 5 g is heavy.
pub const HEAVY_BAND_THRESHOLD_GRAMS: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// The two weight regimes a variant can be priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightBand {
    Light,
    Heavy,
}

impl WeightBand {
    /// Classifies a weight in grams.
    #[must_use]
    pub fn for_weight(weight_grams: Decimal) -> Self {
        if weight_grams < HEAVY_BAND_THRESHOLD_GRAMS {
            Self::Light
        } else {
            Self::Heavy
        }
    }

    /// Classifies a possibly-absent weight.
    ///
    /// An unknown weight never counts as light, so it lands in the heavy band.
    #[must_use]
    pub fn for_optional_weight(weight_grams: Option<Decimal>) -> Self {
        weight_grams.map_or(Self::Heavy, Self::for_weight)
    }
}

impl std::fmt::Display for WeightBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightBand::Light => write!(f, "light"),
            WeightBand::Heavy => write!(f, "heavy"),
        }
    }
}

/// Multipliers and surcharges for each weight band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePolicy {
    pub light_multiplier: Decimal,
    pub light_surcharge: Decimal,
    pub heavy_multiplier: Decimal,
    pub heavy_surcharge: Decimal,
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self {
            light_multiplier: Decimal::new(13, 1),
            light_surcharge: Decimal::new(10, 0),
            heavy_multiplier: Decimal::new(13, 1),
            heavy_surcharge: Decimal::new(20, 0),
        }
    }
}

impl PricePolicy {
    /// Computes the sale price for a variant of the given cost and weight.
    ///
    /// `cost` is expected to have passed [`validate_cost`]. The result is a
    /// whole number no smaller than the cent-rounded raw price, or `None`
    /// when the raw price does not fit in a `Decimal`.
    #[must_use]
    pub fn price_for(&self, cost: Decimal, weight_grams: Decimal) -> Option<Decimal> {
        self.price_in_band(cost, WeightBand::for_weight(weight_grams))
    }

    /// Computes the sale price for `cost` in an explicit band.
    ///
    /// Returns `None` on arithmetic overflow.
    #[must_use]
    pub fn price_in_band(&self, cost: Decimal, band: WeightBand) -> Option<Decimal> {
        let (multiplier, surcharge) = match band {
            WeightBand::Light => (self.light_multiplier, self.light_surcharge),
            WeightBand::Heavy => (self.heavy_multiplier, self.heavy_surcharge),
        };
        let raw = cost.checked_mul(multiplier)?.checked_add(surcharge)?;
        // A value with a fractional part is at most `Decimal::MAX / 10`, so
        // the ceiling's `+ 1` cannot overflow.
        Some(
            raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .ceil(),
        )
    }
}

/// Why an inventory cost cannot be used for pricing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCost {
    #[error("no cost recorded")]
    Missing,

    #[error("cost \"{0}\" is not a number")]
    NotNumeric(String),

    #[error("cost {0} is not positive")]
    NotPositive(Decimal),
}

/// Parses a raw inventory cost and checks it is a positive number.
///
/// # Errors
///
/// - [`InvalidCost::Missing`] when the cost is absent or blank.
/// - [`InvalidCost::NotNumeric`] when it does not parse as a decimal.
/// - [`InvalidCost::NotPositive`] when it is zero or negative.
pub fn validate_cost(raw: Option<&str>) -> Result<Decimal, InvalidCost> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(InvalidCost::Missing);
    };
    let cost = raw
        .parse::<Decimal>()
        .map_err(|_| InvalidCost::NotNumeric(raw.to_owned()))?;
    if cost <= Decimal::ZERO {
        return Err(InvalidCost::NotPositive(cost));
    }
    Ok(cost)
}
