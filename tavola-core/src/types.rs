//! Re-export of foundational types from `tavola-types`.
// Consolidated re-exports so downstream crates can depend on `tavola-core` only

pub use tavola_types::{
    AlignedColumn, AlignedTable, CHANGE_SUFFIX, Change, Column, ColumnData, DATE_COLUMN,
    FinalTable,
};
pub use tavola_types::{BackoffConfig, NormalizationMode, RetryConfig, TavolaConfig};
pub use tavola_types::{ConnectorKey, TavolaError};
pub use tavola_types::{FetchOutcome, FetchReport};
pub use tavola_types::{Observation, RawSeries, SeriesFrame, SeriesId, SeriesSpec, TableRequest};
