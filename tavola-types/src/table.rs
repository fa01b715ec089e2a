//! Aligned and final table shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TavolaError;
use crate::series::SeriesId;

/// Name of the leading date column in every final table.
pub const DATE_COLUMN: &str = "date";

/// Suffix appended to a value column name to name its percent-change column.
pub const CHANGE_SUFFIX: &str = "-change";

/// One series projected onto the common axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedColumn {
    /// Identifier the column belongs to.
    pub id: SeriesId,
    /// One entry per axis date; `None` where the series has no observation.
    pub values: Vec<Option<f64>>,
}

/// Multiple series sharing a strictly increasing date axis.
///
/// Columns appear in request order. Only series that contributed at least one
/// observation have a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignedTable {
    /// Common axis, strictly increasing.
    pub axis: Vec<NaiveDate>,
    /// Columns, each with `axis.len()` entries.
    pub columns: Vec<AlignedColumn>,
}

impl AlignedTable {
    /// Table with no axis and no columns.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            axis: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Whether no series contributed any observation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by identifier.
    #[must_use]
    pub fn column(&self, id: &str) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| c.id.as_str() == id)
    }
}

/// Percent-change cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    /// No predecessor row, or an underlying value is missing.
    Absent,
    /// The predecessor value is zero (or the ratio is not finite).
    Undefined,
    /// Percent change from the preceding row.
    Value(f64),
}

impl Change {
    /// The numeric change, if defined.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Undefined => None,
        }
    }

    /// Whether this cell is the undefined sentinel.
    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// Cell payload of a final-table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnData {
    /// Gap-filled series values.
    Values(Vec<Option<f64>>),
    /// Percent change of the paired value column.
    Changes(Vec<Change>),
}

impl ColumnData {
    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Changes(c) => c.len(),
        }
    }

    /// Whether the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column of the final table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Header name.
    pub name: String,
    /// Identifier the column derives from.
    pub series: SeriesId,
    /// Cells, one per row.
    pub data: ColumnData,
}

/// The assembled, immutable result of a request.
///
/// Column layout is `date` followed by, per series in request order, its value
/// column and (when requested) its change column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FinalTableRepr")]
pub struct FinalTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

// Deserialized tables go through `FinalTable::new`.
#[derive(Deserialize)]
struct FinalTableRepr {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TryFrom<FinalTableRepr> for FinalTable {
    type Error = TavolaError;

    fn try_from(raw: FinalTableRepr) -> Result<Self, Self::Error> {
        Self::new(raw.dates, raw.columns)
    }
}

impl FinalTable {
    /// Build a final table.
    ///
    /// # Errors
    /// Returns `Data` if `dates` is not strictly increasing, if any column length
    /// differs from the row count, or if two columns share a name.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, TavolaError> {
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TavolaError::Data(
                "final table dates must be strictly increasing".into(),
            ));
        }
        for (i, c) in columns.iter().enumerate() {
            if c.data.len() != dates.len() {
                return Err(TavolaError::Data(format!(
                    "column '{}' has {} cells for {} rows",
                    c.name,
                    c.data.len(),
                    dates.len()
                )));
            }
            if c.name == DATE_COLUMN || columns[..i].iter().any(|p| p.name == c.name) {
                return Err(TavolaError::Data(format!("duplicate column '{}'", c.name)));
            }
        }
        Ok(Self { dates, columns })
    }

    /// Row dates, strictly increasing.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Non-date columns in output order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// Header row: `date` followed by every column name.
    #[must_use]
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(DATE_COLUMN)
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Look up a column by header name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Gap-filled values for an identifier.
    #[must_use]
    pub fn values(&self, series: &str) -> Option<&[Option<f64>]> {
        self.columns.iter().find_map(|c| match &c.data {
            ColumnData::Values(v) if c.series.as_str() == series => Some(v.as_slice()),
            _ => None,
        })
    }

    /// Percent-change cells for an identifier, when derived columns were requested.
    #[must_use]
    pub fn changes(&self, series: &str) -> Option<&[Change]> {
        self.columns.iter().find_map(|c| match &c.data {
            ColumnData::Changes(v) if c.series.as_str() == series => Some(v.as_slice()),
            _ => None,
        })
    }
}
