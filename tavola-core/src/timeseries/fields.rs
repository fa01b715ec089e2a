use tavola_types::{Observation, RawSeries, SeriesFrame, TavolaError};

/// Value field served by FRED-style indicator providers.
pub const INDICATOR_VALUE_FIELDS: &[&str] = &["value"];

/// Market close fields: adjusted close first, plain close as fallback.
pub const MARKET_CLOSE_FIELDS: &[&str] = &["adjclose", "close"];

/// Pick the first candidate field present in `frame`.
pub fn select_value_field<'a, S>(frame: &SeriesFrame, candidates: &'a [S]) -> Option<&'a str>
where
    S: AsRef<str>,
{
    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|name| frame.field(name).is_some())
}

/// Project a provider frame onto a raw series using the first present candidate field.
///
/// A frame without dates is an empty series regardless of its fields.
///
/// # Errors
/// Returns `MissingField` when the frame has dates but none of the candidates.
pub fn frame_to_series<S>(frame: &SeriesFrame, candidates: &[S]) -> Result<RawSeries, TavolaError>
where
    S: AsRef<str>,
{
    if frame.is_empty() {
        return Ok(RawSeries::empty(frame.series().clone()));
    }
    let values = select_value_field(frame, candidates)
        .and_then(|name| frame.field(name))
        .ok_or_else(|| TavolaError::MissingField {
            series: frame.series().to_string(),
            tried: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })?;

    let observations = frame
        .dates()
        .iter()
        .zip(values)
        .map(|(&date, &value)| Observation {
            date,
            value: value.filter(|v| v.is_finite()),
        })
        .collect();
    Ok(RawSeries::new(frame.series().clone(), observations))
}
