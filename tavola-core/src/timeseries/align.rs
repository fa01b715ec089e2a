use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use tavola_types::{AlignedColumn, AlignedTable, NormalizationMode, RawSeries};

/// Map a date onto the calendar granularity of `mode`.
#[must_use]
pub fn normalize_date(date: NaiveDate, mode: NormalizationMode) -> NaiveDate {
    match mode {
        NormalizationMode::MonthStart => date.with_day(1).unwrap_or(date),
        NormalizationMode::Daily => date,
    }
}

/// Normalize one series' dates, keyed by normalized date.
///
/// When several observations collapse onto the same date the latest original
/// date wins, independent of provider ordering.
#[must_use]
pub fn normalize_series(
    series: &RawSeries,
    mode: NormalizationMode,
) -> BTreeMap<NaiveDate, Option<f64>> {
    let mut obs: Vec<_> = series.observations.iter().collect();
    obs.sort_by_key(|o| o.date);

    let mut out = BTreeMap::new();
    for o in obs {
        out.insert(normalize_date(o.date, mode), o.value);
    }
    out
}

/// Align raw series onto the union of their normalized dates.
///
/// - Columns follow the order of `series`; identifiers are expected to be unique.
/// - Series with no observations are dropped and get no column.
/// - If every series is empty the result is an empty table.
#[must_use]
pub fn align_series(series: &[RawSeries], mode: NormalizationMode) -> AlignedTable {
    let normalized: Vec<(&RawSeries, BTreeMap<NaiveDate, Option<f64>>)> = series
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| (s, normalize_series(s, mode)))
        .collect();

    if normalized.is_empty() {
        return AlignedTable::empty();
    }

    let axis: Vec<NaiveDate> = normalized
        .iter()
        .flat_map(|(_, m)| m.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns = normalized
        .into_iter()
        .map(|(s, m)| AlignedColumn {
            id: s.id.clone(),
            values: axis.iter().map(|d| m.get(d).copied().flatten()).collect(),
        })
        .collect();

    AlignedTable { axis, columns }
}
