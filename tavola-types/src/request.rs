//! Per-request table parameters.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::NormalizationMode;
use crate::error::TavolaError;
use crate::series::SeriesSpec;
use crate::table::{CHANGE_SUFFIX, DATE_COLUMN};

/// Parameters of one table request.
///
/// Built incrementally by the orchestrator's table builder and checked with
/// [`TableRequest::validate`] before any provider is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRequest {
    /// Requested series in output order.
    pub series: Vec<SeriesSpec>,
    /// First date of the inclusive range.
    pub start: NaiveDate,
    /// Last date of the inclusive range.
    pub end: NaiveDate,
    /// Calendar normalization; `None` uses the connector default.
    pub normalization: Option<NormalizationMode>,
    /// Emit a percent-change column after each value column.
    pub with_changes: bool,
    /// Candidate value fields overriding the connector's list.
    pub value_fields: Option<Vec<String>>,
}

impl TableRequest {
    /// Request for `series` over `[start, end]` with connector defaults.
    #[must_use]
    pub const fn new(series: Vec<SeriesSpec>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            series,
            start,
            end,
            normalization: None,
            with_changes: false,
            value_fields: None,
        }
    }

    /// Header names this request would produce, `date` first.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut out = vec![DATE_COLUMN.to_string()];
        for spec in &self.series {
            let name = spec.column_name();
            out.push(name.to_string());
            if self.with_changes {
                out.push(format!("{name}{CHANGE_SUFFIX}"));
            }
        }
        out
    }

    /// Check the request before fetching.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the series list is empty, an identifier is
    /// repeated, a label is empty, two columns would share a name, `start` is
    /// after `end`, or the value-field override is empty.
    pub fn validate(&self) -> Result<(), TavolaError> {
        if self.series.is_empty() {
            return Err(TavolaError::invalid_config("no series specified"));
        }

        let mut seen = HashSet::new();
        for spec in &self.series {
            if !seen.insert(spec.id.as_str()) {
                return Err(TavolaError::invalid_config(format!(
                    "duplicate series '{}'",
                    spec.id
                )));
            }
            if spec.label.as_deref().is_some_and(str::is_empty) {
                return Err(TavolaError::invalid_config(format!(
                    "empty label for series '{}'",
                    spec.id
                )));
            }
        }

        let mut names = HashSet::new();
        for name in self.column_names() {
            if !names.insert(name.clone()) {
                return Err(TavolaError::invalid_config(format!(
                    "column name '{name}' is used more than once"
                )));
            }
        }

        if self.start > self.end {
            return Err(TavolaError::invalid_config(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }

        if let Some(fields) = &self.value_fields
            && (fields.is_empty() || fields.iter().any(String::is_empty))
        {
            return Err(TavolaError::invalid_config(
                "value field override must list at least one non-empty field",
            ));
        }
        Ok(())
    }
}
