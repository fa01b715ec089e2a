use serde::{Deserialize, Serialize};
use tavola_types::{
    Column, ColumnData, FinalTable, NormalizationMode, RawSeries, SeriesSpec, TavolaError,
};

use super::align::align_series;
use super::change::percent_change;
use super::columns::{ColumnKind, plan_columns};
use super::fill::fill_table;

/// Options for turning raw series into a final table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssemblyOptions {
    /// Calendar normalization applied before alignment.
    pub mode: NormalizationMode,
    /// Emit a percent-change column after each value column.
    pub with_changes: bool,
}

/// Run align → fill → change → order over already-fetched series.
///
/// Returns `Ok(None)` when no series contributed an observation. Series in
/// `raw` that are not listed in `requested` neither get a column nor add dates
/// to the axis; requested series missing from `raw` get no column.
///
/// # Errors
/// Returns `Data` only if the assembled columns violate the table invariants,
/// which indicates duplicate identifiers or labels in `requested`.
pub fn assemble_table(
    requested: &[SeriesSpec],
    raw: &[RawSeries],
    opts: AssemblyOptions,
) -> Result<Option<FinalTable>, TavolaError> {
    let relevant: Vec<RawSeries> = raw
        .iter()
        .filter(|r| requested.iter().any(|s| s.id == r.id))
        .cloned()
        .collect();
    let aligned = align_series(&relevant, opts.mode);
    if aligned.is_empty() {
        return Ok(None);
    }
    let filled = fill_table(aligned);
    let slots = plan_columns(requested, &filled, opts.with_changes);

    let mut columns = Vec::with_capacity(slots.len());
    for slot in slots {
        let Some(source) = filled.column(slot.series.as_str()) else {
            continue;
        };
        let data = match slot.kind {
            ColumnKind::Value => ColumnData::Values(source.values.clone()),
            ColumnKind::Change => ColumnData::Changes(percent_change(&source.values)),
        };
        columns.push(Column {
            name: slot.name,
            series: slot.series,
            data,
        });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rows = filled.axis.len(),
        columns = columns.len(),
        "assembled table"
    );

    FinalTable::new(filled.axis, columns).map(Some)
}
