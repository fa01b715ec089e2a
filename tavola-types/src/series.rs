//! Series identifiers, observations, and provider frames.

use core::fmt;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TavolaError;

/// Opaque, non-empty key naming a requested series (an indicator code or a ticker).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeriesId(String);

impl SeriesId {
    /// Construct an identifier.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, TavolaError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TavolaError::invalid_config("series identifier must not be empty"));
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SeriesId {
    type Error = TavolaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SeriesId {
    type Error = TavolaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeriesId> for String {
    fn from(id: SeriesId) -> Self {
        id.0
    }
}

impl AsRef<str> for SeriesId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single dated observation. `value` is `None` when the provider reported
/// the date but marked the value as missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date as reported by the provider.
    pub date: NaiveDate,
    /// Observed value, if present.
    pub value: Option<f64>,
}

impl Observation {
    /// Observation with a present value.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value: Some(value),
        }
    }

    /// Observation whose value the provider marked as missing.
    #[must_use]
    pub const fn missing(date: NaiveDate) -> Self {
        Self { date, value: None }
    }
}

/// Observations for one identifier, as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    /// Identifier the observations belong to.
    pub id: SeriesId,
    /// Observations in provider order; may be empty.
    pub observations: Vec<Observation>,
}

impl RawSeries {
    /// Build a raw series.
    #[must_use]
    pub const fn new(id: SeriesId, observations: Vec<Observation>) -> Self {
        Self { id, observations }
    }

    /// Raw series with no observations.
    #[must_use]
    pub const fn empty(id: SeriesId) -> Self {
        Self {
            id,
            observations: Vec::new(),
        }
    }

    /// Whether the provider returned nothing for the range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }
}

/// Provider-layer table for one identifier: a date index plus named numeric fields.
///
/// FRED frames carry a single `value` field; market frames carry
/// `adjclose`, `close`, `open`, and friends. Every field has exactly one entry
/// per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFrame {
    series: SeriesId,
    dates: Vec<NaiveDate>,
    fields: BTreeMap<String, Vec<Option<f64>>>,
}

impl SeriesFrame {
    /// Frame over `dates` with no fields yet.
    #[must_use]
    pub const fn new(series: SeriesId, dates: Vec<NaiveDate>) -> Self {
        Self {
            series,
            dates,
            fields: BTreeMap::new(),
        }
    }

    /// Frame for a range with no observations.
    #[must_use]
    pub const fn empty(series: SeriesId) -> Self {
        Self::new(series, Vec::new())
    }

    /// Attach a named field.
    ///
    /// # Errors
    /// Returns `Data` if `values` does not have one entry per date.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, TavolaError> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(TavolaError::Data(format!(
                "field '{name}' of {} has {} values for {} dates",
                self.series,
                values.len(),
                self.dates.len()
            )));
        }
        self.fields.insert(name, values);
        Ok(self)
    }

    /// Identifier this frame was fetched for.
    #[must_use]
    pub const fn series(&self) -> &SeriesId {
        &self.series
    }

    /// Date index.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Values of a named field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&[Option<f64>]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Names of the fields present in this frame, sorted.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the frame has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A requested series together with its optional display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Identifier passed to the provider.
    pub id: SeriesId,
    /// Header name used instead of the identifier, if set.
    pub label: Option<String>,
}

impl SeriesSpec {
    /// Spec without a label.
    #[must_use]
    pub const fn new(id: SeriesId) -> Self {
        Self { id, label: None }
    }

    /// Spec with a display label.
    #[must_use]
    pub fn labeled(id: SeriesId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: Some(label.into()),
        }
    }

    /// Name of the value column: the label if present, else the identifier.
    #[must_use]
    pub fn column_name(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}
