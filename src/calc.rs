//! Line-item sales arithmetic.
//!
//! Every row of the report carries a product, a unit price, and the
//! quantities delivered to and returned from the point of sale. The sold
//! quantity is delivered minus returned; weight-priced products are entered
//! in grams and converted to kilograms before pricing. Line totals are
//! rounded to whole currency units per line, before any aggregation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{ProductDefinition, UnitKind};

const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// A row's returned quantity exceeds what was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("returned quantity {returned} exceeds delivered quantity {delivered}")]
pub struct QuantityError {
    pub delivered: u32,
    pub returned: u32,
}

/// Derived values for one priced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemResult {
    pub quantity_sold: u32,
    /// Whole currency units, rounded half away from zero.
    pub line_total: i64,
}

/// Round a monetary amount to whole currency units, half away from zero.
pub fn round_currency(amount: f64) -> i64 {
    amount.round() as i64
}

/// Price one report line.
///
/// Rejects `returned > delivered`. For [`UnitKind::WeightInGrams`] products
/// the sold grams are divided by 1000 before applying the per-kilogram
/// price; discrete products price the sold count directly.
pub fn compute_line_item(
    definition: &ProductDefinition,
    unit_price: f64,
    delivered: u32,
    returned: u32,
) -> Result<LineItemResult, QuantityError> {
    if returned > delivered {
        return Err(QuantityError {
            delivered,
            returned,
        });
    }
    let sold = delivered - returned;
    Ok(LineItemResult {
        quantity_sold: sold,
        line_total: price_sold_quantity(definition.unit_kind, unit_price, sold),
    })
}

/// One line of the live entry view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinePreview {
    pub quantity_sold: u32,
    pub line_total: i64,
    /// The row must be corrected before the report can be saved.
    pub returned_exceeds_delivered: bool,
}

/// Price one line leniently for the live entry view.
///
/// Never fails: an invalid row (returned > delivered) sells zero units,
/// contributes zero revenue, and is flagged so the view can mark it.
pub fn preview_line_item(
    definition: &ProductDefinition,
    unit_price: f64,
    delivered: u32,
    returned: u32,
) -> LinePreview {
    let sold = delivered.saturating_sub(returned);
    LinePreview {
        quantity_sold: sold,
        line_total: price_sold_quantity(definition.unit_kind, unit_price, sold),
        returned_exceeds_delivered: returned > delivered,
    }
}

fn price_sold_quantity(unit_kind: UnitKind, unit_price: f64, sold: u32) -> i64 {
    let monetary_qty = match unit_kind {
        UnitKind::WeightInGrams => f64::from(sold) / GRAMS_PER_KILOGRAM,
        UnitKind::Discrete => f64::from(sold),
    };
    round_currency(unit_price * monetary_qty)
}
