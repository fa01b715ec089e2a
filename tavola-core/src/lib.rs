//! tavola-core
//!
//! Core types, traits, and utilities shared across the tavola ecosystem.
//!
//! - `types`: common data structures (identifiers, observations, tables, reports).
//! - `connector`: the `TavolaConnector` trait and the `SeriesProvider` capability.
//! - `timeseries`: the alignment engine that turns independently-shaped series
//!   into one gap-free, chronologically ordered table.
//! - `export`: CSV rendering of the final table.
//!
//! The engine is synchronous and pure: the same raw series always produce the
//! same table, byte for byte once exported.
#![warn(missing_docs)]

/// Connector capability traits and the primary `TavolaConnector` interface.
pub mod connector;
/// CSV export of final tables.
pub mod export;
/// Series alignment, gap filling, and derived columns.
pub mod timeseries;
pub mod types;

pub use connector::{SeriesProvider, TavolaConnector};
pub use export::{CsvExport, CsvOptions};
pub use timeseries::align::{align_series, normalize_date, normalize_series};
pub use timeseries::assemble::{AssemblyOptions, assemble_table};
pub use timeseries::change::{change_between, percent_change};
pub use timeseries::columns::{ColumnKind, ColumnSlot, plan_columns};
pub use timeseries::fields::{
    INDICATOR_VALUE_FIELDS, MARKET_CLOSE_FIELDS, frame_to_series, select_value_field,
};
pub use timeseries::fill::{fill_gaps, fill_table};
pub use types::*;
