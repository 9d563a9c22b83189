//! Caja Diaria - daily point-of-sale reconciliation.
//!
//! An operator enters per-product delivered/returned quantities and prices
//! plus the cash-drawer figures for the day. This crate computes units sold
//! and revenue per line, derives the expected-sales figure and the cash
//! variance, validates and persists the finished report into an append-only
//! local history, and renders the printable closing receipt ("boucher").
//!
//! The entry surface (form, modal, print window) lives outside this crate;
//! it re-invokes [`report::preview_report`] on every qualifying input change
//! and calls [`report::build_report`] + [`store::ReportStore::save_report`]
//! when the operator closes the day.

use chrono::Local;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod calc;
pub mod catalog;
pub mod db;
pub mod error;
pub mod receipt;
pub mod report;
pub mod store;

pub use catalog::{Catalog, ProductDefinition, UnitKind};
pub use error::{StoreError, ValidationError};
pub use receipt::{BoucherDoc, LayoutConfig, PaperWidth};
pub use report::{
    build_report, preview_report, CashInputs, LineItemInput, ReportMeta, ReportRecord,
    VarianceClass,
};
pub use store::{ReportHistory, ReportStore};

/// Today's calendar date in the local timezone, `YYYY-MM-DD`. The default
/// report date.
pub fn local_iso_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Initialize structured logging (console + rolling daily file).
///
/// Call once at startup. The file-appender guard is leaked so logs keep
/// flushing for the lifetime of the process.
pub fn init_tracing(log_dir: &std::path::Path) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caja_diaria=debug"));

    std::fs::create_dir_all(log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(log_dir, "caja");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let console_layer = fmt::layer().with_target(true);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    // Dropping the guard flushes logs; this process logs until exit.
    std::mem::forget(guard);

    info!("caja-diaria v{} logging initialized", env!("CARGO_PKG_VERSION"));
}
