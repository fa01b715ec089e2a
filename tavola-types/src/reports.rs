//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::TavolaError;
use crate::series::SeriesId;
use crate::table::FinalTable;

/// Outcome of a table request that did not fail outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    /// At least one series produced observations.
    Table(FinalTable),
    /// The request was valid but no series had data in range.
    Empty,
}

/// Summary of a table request.
///
/// Carries the outcome, the per-series errors that were recovered locally, and
/// the identifiers that returned no observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchReport {
    /// Assembled table or the empty-result signal.
    pub outcome: FetchOutcome,
    /// Non-fatal issues; each names the series it dropped.
    pub warnings: Vec<TavolaError>,
    /// Series that were fetched successfully but had no observations in range.
    pub empty_series: Vec<SeriesId>,
}

impl FetchReport {
    /// The assembled table, if any.
    #[must_use]
    pub const fn table(&self) -> Option<&FinalTable> {
        match &self.outcome {
            FetchOutcome::Table(t) => Some(t),
            FetchOutcome::Empty => None,
        }
    }

    /// Consume the report and return the table, if any.
    #[must_use]
    pub fn into_table(self) -> Option<FinalTable> {
        match self.outcome {
            FetchOutcome::Table(t) => Some(t),
            FetchOutcome::Empty => None,
        }
    }

    /// Whether the request produced no data.
    #[must_use]
    pub const fn is_empty_result(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Empty)
    }

    /// Whether a table was produced while some series were dropped on error.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.is_empty_result() && !self.warnings.is_empty()
    }

    /// Identifiers dropped because of an error, in request order.
    #[must_use]
    pub fn dropped_series(&self) -> Vec<&str> {
        self.warnings.iter().filter_map(TavolaError::series).collect()
    }
}
