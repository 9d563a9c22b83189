//! Report aggregation: validated, immutable daily reconciliation records.
//!
//! `build_report` is the save-time path: validate everything, price every
//! line, derive the aggregate figures, stamp id and timestamp, and hand back
//! a record that is never mutated again. `preview_report` is the live entry
//! view over the same arithmetic, applied leniently so the operator gets
//! running totals while rows are still incomplete.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calc;
use crate::catalog::{Catalog, UnitKind};
use crate::error::ValidationError;

/// One row of the report as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub product_id: String,
    /// Per unit for discrete products, per kilogram for weight-priced ones.
    pub unit_price: f64,
    pub quantity_delivered: u32,
    pub quantity_returned: u32,
}

/// Cash-drawer side of the reconciliation, whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashInputs {
    pub cash_counted: i64,
    pub expenses: i64,
    pub transfers_received: i64,
    pub other_income: i64,
}

/// Date and point-of-sale header of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Calendar date, ISO-8601 (`YYYY-MM-DD`).
    pub date: String,
    pub pos_name: String,
}

/// A finalized report line: the entered values merged with the derived ones
/// and the product data they resolved against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub product_name: String,
    pub unit_kind: UnitKind,
    pub unit_price: f64,
    pub quantity_delivered: u32,
    pub quantity_returned: u32,
    pub quantity_sold: u32,
    pub line_total: i64,
}

/// The persisted, immutable reconciliation record. Created exactly once at
/// save time, appended to the history, never edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    pub date: String,
    pub pos_name: String,
    /// Entry order.
    pub line_items: Vec<LineItem>,
    pub cash_counted: i64,
    pub expenses: i64,
    pub transfers_received: i64,
    pub other_income: i64,
    /// Sum of the per-line totals, each rounded before summation.
    pub merchandise_total: i64,
    /// merchandise + transfers + other income - expenses.
    pub expected_sales: i64,
    /// counted cash - expected sales.
    pub cash_variance: i64,
    /// RFC 3339, stamped when the record is built.
    pub created_at: String,
}

impl ReportRecord {
    pub fn variance_class(&self) -> VarianceClass {
        VarianceClass::of(self.cash_variance)
    }
}

/// Direction of the cash variance. Derived from the stored amount by every
/// consumer, never stored itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceClass {
    Surplus,
    Shortage,
    Balanced,
}

impl VarianceClass {
    pub fn of(cash_variance: i64) -> Self {
        match cash_variance.cmp(&0) {
            std::cmp::Ordering::Greater => Self::Surplus,
            std::cmp::Ordering::Less => Self::Shortage,
            std::cmp::Ordering::Equal => Self::Balanced,
        }
    }
}

/// Validate the entered report and assemble the immutable record.
///
/// Checks run in violation-class order and the first failure wins: trimmed
/// pos name, at least one line, every product id resolvable, and on every
/// line returned <= delivered (the calculator enforces the last one while
/// pricing). On failure nothing is created and no state is touched.
pub fn build_report(
    catalog: &Catalog,
    meta: &ReportMeta,
    cash: &CashInputs,
    lines: &[LineItemInput],
) -> Result<ReportRecord, ValidationError> {
    let pos_name = meta.pos_name.trim();
    if pos_name.is_empty() {
        return Err(ValidationError::EmptyPosName);
    }
    if lines.is_empty() {
        return Err(ValidationError::NoLineItems);
    }
    for line in lines {
        if !catalog.contains(&line.product_id) {
            return Err(ValidationError::UnknownProduct(line.product_id.clone()));
        }
    }

    let mut line_items = Vec::with_capacity(lines.len());
    let mut merchandise_total: i64 = 0;
    for (index, line) in lines.iter().enumerate() {
        let definition = catalog
            .get(&line.product_id)
            .ok_or_else(|| ValidationError::UnknownProduct(line.product_id.clone()))?;
        let result = calc::compute_line_item(
            definition,
            line.unit_price,
            line.quantity_delivered,
            line.quantity_returned,
        )
        .map_err(|_| ValidationError::ReturnedExceedsDelivered(index))?;

        merchandise_total += result.line_total;
        line_items.push(LineItem {
            product_id: line.product_id.clone(),
            product_name: definition.name.clone(),
            unit_kind: definition.unit_kind,
            unit_price: line.unit_price,
            quantity_delivered: line.quantity_delivered,
            quantity_returned: line.quantity_returned,
            quantity_sold: result.quantity_sold,
            line_total: result.line_total,
        });
    }

    let expected_sales = expected_sales(merchandise_total, cash);
    let record = ReportRecord {
        id: Uuid::new_v4().to_string(),
        date: meta.date.clone(),
        pos_name: pos_name.to_string(),
        line_items,
        cash_counted: cash.cash_counted,
        expenses: cash.expenses,
        transfers_received: cash.transfers_received,
        other_income: cash.other_income,
        merchandise_total,
        expected_sales,
        cash_variance: cash.cash_counted - expected_sales,
        created_at: Utc::now().to_rfc3339(),
    };

    info!(
        report_id = %record.id,
        pos_name = %record.pos_name,
        merchandise_total = record.merchandise_total,
        cash_variance = record.cash_variance,
        "Reconciliation report built"
    );

    Ok(record)
}

/// Running totals for the live entry view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPreview {
    /// One entry per input line, in entry order.
    pub lines: Vec<calc::LinePreview>,
    pub merchandise_total: i64,
    pub expected_sales: i64,
    pub cash_variance: i64,
}

impl ReportPreview {
    pub fn variance_class(&self) -> VarianceClass {
        VarianceClass::of(self.cash_variance)
    }
}

/// Recompute the live totals from the current form state.
///
/// Lenient by design: rows whose product id does not resolve contribute
/// nothing, and rows with returned > delivered contribute nothing and come
/// back flagged. Meant to be re-invoked on every qualifying input change.
pub fn preview_report(
    catalog: &Catalog,
    cash: &CashInputs,
    lines: &[LineItemInput],
) -> ReportPreview {
    let mut previews = Vec::with_capacity(lines.len());
    let mut merchandise_total: i64 = 0;
    for line in lines {
        let preview = match catalog.get(&line.product_id) {
            Some(definition) => calc::preview_line_item(
                definition,
                line.unit_price,
                line.quantity_delivered,
                line.quantity_returned,
            ),
            None => calc::LinePreview {
                quantity_sold: 0,
                line_total: 0,
                returned_exceeds_delivered: false,
            },
        };
        merchandise_total += preview.line_total;
        previews.push(preview);
    }

    let expected_sales = expected_sales(merchandise_total, cash);
    ReportPreview {
        lines: previews,
        merchandise_total,
        expected_sales,
        cash_variance: cash.cash_counted - expected_sales,
    }
}

fn expected_sales(merchandise_total: i64, cash: &CashInputs) -> i64 {
    merchandise_total + cash.transfers_received + cash.other_income - cash.expenses
}
