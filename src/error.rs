//! Error taxonomy for report validation and persistence.
//!
//! Validation failures are recoverable, user-correctable conditions: no
//! report is created and no history is touched. Persistence failures degrade
//! gracefully — a corrupt slot reads as an empty history, and a failed write
//! never invalidates the in-memory report.

use thiserror::Error;

/// Rejection of a report at save time. The first violation found is
/// reported, in check order: pos name, line presence, product resolution,
/// quantity consistency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The point-of-sale name is empty after trimming whitespace.
    #[error("point of sale name is required")]
    EmptyPosName,
    /// The report has no product lines.
    #[error("the report needs at least one product line")]
    NoLineItems,
    /// A line references a product id missing from the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    /// A line's returned quantity exceeds its delivered quantity. Carries
    /// the zero-based index of the offending line.
    #[error("line {0}: returned quantity exceeds delivered quantity")]
    ReturnedExceedsDelivered(usize),
}

/// Failure at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the serialized history back to its slot failed. The report
    /// that triggered the save is still valid in memory.
    #[error("failed to write report history: {0}")]
    WriteFailed(String),
    /// The stored history slot holds unparseable data.
    #[error("stored report history is corrupt: {0}")]
    ReadCorrupt(#[from] serde_json::Error),
}

impl From<ValidationError> for String {
    fn from(err: ValidationError) -> String {
        err.to_string()
    }
}

impl From<StoreError> for String {
    fn from(err: StoreError) -> String {
        err.to_string()
    }
}
