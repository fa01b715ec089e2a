use tavola_types::{AlignedTable, CHANGE_SUFFIX, SeriesId, SeriesSpec};

/// Kind of a planned output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Gap-filled series values.
    Value,
    /// Percent change of the preceding value column.
    Change,
}

/// One planned output column (the leading date column is implicit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSlot {
    /// Identifier the column derives from.
    pub series: SeriesId,
    /// Header name.
    pub name: String,
    /// Value or change column.
    pub kind: ColumnKind,
}

/// Plan the output columns.
///
/// Walks `requested` in order and, for each series that has a column in
/// `aligned`, emits its value column immediately followed by its change column
/// when `with_changes` is set. Series absent from `aligned` are skipped.
#[must_use]
pub fn plan_columns(
    requested: &[SeriesSpec],
    aligned: &AlignedTable,
    with_changes: bool,
) -> Vec<ColumnSlot> {
    let mut out = Vec::with_capacity(requested.len() * if with_changes { 2 } else { 1 });
    for spec in requested {
        if aligned.column(spec.id.as_str()).is_none() {
            continue;
        }
        let name = spec.column_name();
        out.push(ColumnSlot {
            series: spec.id.clone(),
            name: name.to_string(),
            kind: ColumnKind::Value,
        });
        if with_changes {
            out.push(ColumnSlot {
                series: spec.id.clone(),
                name: format!("{name}{CHANGE_SUFFIX}"),
                kind: ColumnKind::Change,
            });
        }
    }
    out
}
