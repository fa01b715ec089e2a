//! Tavola fetches named economic and market time series and aligns them into
//! one gap-free, chronologically ordered table.
//!
//! Overview
//! - Fetches every requested series from a single connector that implements
//!   the `tavola_core` contracts (FRED, Yahoo Finance, or a mock).
//! - Normalizes dates (month-start for indicators, daily for markets), builds a
//!   common axis, fills gaps forward then backward, and optionally derives
//!   percent-change columns.
//! - Keeps going when individual series fail: they are dropped and reported as
//!   warnings, while a rejected credential aborts the request.
//!
//! Key behaviors and trade-offs
//! - Concurrency: calls run `parallelism` at a time; results are collected in
//!   request order, so output never depends on completion order.
//! - Timeouts: each provider call is bounded by `provider_timeout`; an optional
//!   `request_timeout` bounds the whole fan-out.
//! - Retries: opt-in, applied only to transient errors, with exponential backoff
//!   and jitter to spread bursts against rate-limited providers.
//!
//! Examples
//! Building a table of monthly indicators with change columns:
//! ```rust,ignore
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use tavola::{CsvExport, CsvOptions, Tavola};
//!
//! let fred = Arc::new(tavola_fred::FredConnector::new(api_key)?);
//! let tavola = Tavola::builder().with_connector(fred).build()?;
//!
//! let report = tavola
//!     .table()
//!     .series(&["UNRATE", "FEDFUNDS"])?
//!     .period(
//!         NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//!     )
//!     .with_changes(true)
//!     .run()
//!     .await?;
//!
//! for w in &report.warnings {
//!     eprintln!("dropped: {w}");
//! }
//! if let Some(table) = report.table() {
//!     table.write_csv_path("econ_data", &CsvOptions::default())?;
//! }
//! ```
//!
//! See `demos/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{Tavola, TavolaBuilder};
pub use router::table::TableBuilder;
pub use router::util::{SeriesResult, collapse_results};

// Re-export core types for convenience
pub use tavola_core::{
    AssemblyOptions, BackoffConfig, Change, Column, ColumnData, CsvExport, CsvOptions,
    FetchOutcome, FetchReport, FinalTable, NormalizationMode, Observation, RawSeries,
    RetryConfig, SeriesFrame, SeriesId, SeriesProvider, SeriesSpec, TableRequest, TavolaConfig,
    TavolaConnector, TavolaError,
};
