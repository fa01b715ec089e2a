use tavola_types::Change;

/// Percent change from `prev` to `cur`.
///
/// Returns `Change::Undefined` for a zero base or a non-finite ratio.
#[must_use]
pub fn change_between(prev: f64, cur: f64) -> Change {
    if prev == 0.0 {
        return Change::Undefined;
    }
    let pct = (cur - prev) / prev * 100.0;
    if pct.is_finite() {
        Change::Value(pct)
    } else {
        Change::Undefined
    }
}

/// Row-over-row percent change of a date-ordered column.
///
/// Row 0 is always `Absent`; so is any row where this or the previous value is missing.
#[must_use]
pub fn percent_change(values: &[Option<f64>]) -> Vec<Change> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(Change::Absent);
    out.extend(values.windows(2).map(|w| match (w[0], w[1]) {
        (Some(prev), Some(cur)) => change_between(prev, cur),
        _ => Change::Absent,
    }));
    out
}
