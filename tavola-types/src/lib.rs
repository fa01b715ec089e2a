//! Tavola-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod reports;
mod request;
mod series;
mod table;

pub use config::{BackoffConfig, NormalizationMode, RetryConfig, TavolaConfig};
pub use connector::ConnectorKey;
pub use error::TavolaError;
pub use reports::{FetchOutcome, FetchReport};
pub use request::TableRequest;
pub use series::{Observation, RawSeries, SeriesFrame, SeriesId, SeriesSpec};
pub use table::{
    AlignedColumn, AlignedTable, CHANGE_SUFFIX, Change, Column, ColumnData, DATE_COLUMN,
    FinalTable,
};
