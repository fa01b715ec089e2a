use chrono::NaiveDate;
use tavola_core::{SeriesFrame, SeriesId, TavolaError};

use super::month_starts;

/// Monthly indicator codes served by the mock.
pub const CODES: &[&str] = &["UNRATE", "FEDFUNDS", "UMCSENT", "CPIAUCSL", "GDP"];

const UMCSENT_GAP: Option<NaiveDate> = NaiveDate::from_ymd_opt(2020, 4, 1);

fn value_at(code: &str, i: usize, date: NaiveDate) -> Option<Option<f64>> {
    let x = i as f64;
    let v = match code {
        "UNRATE" => Some(3.5 + (i % 12) as f64 * 0.1),
        "FEDFUNDS" => Some(if i < 24 { 2.0 } else { 0.25 + (i % 7) as f64 * 0.5 }),
        // one missing reading, the way FRED reports "."
        "UMCSENT" if Some(date) == UMCSENT_GAP => None,
        "UMCSENT" => Some(70.0 + (i % 9) as f64 * 2.5),
        "CPIAUCSL" => Some(250.0 + x * 0.4),
        // quarterly: only the first month of each quarter
        "GDP" if i % 3 != 0 => return None,
        "GDP" => Some(20_000.0 + x * 50.0),
        _ => return None,
    };
    Some(v)
}

/// Indicator frame with a single `value` field.
pub fn frame(id: &SeriesId, start: NaiveDate, end: NaiveDate) -> Result<SeriesFrame, TavolaError> {
    let (dates, values): (Vec<NaiveDate>, Vec<Option<f64>>) = month_starts(start, end)
        .into_iter()
        .filter_map(|(i, d)| value_at(id.as_str(), i, d).map(|v| (d, v)))
        .unzip();
    SeriesFrame::new(id.clone(), dates).with_field("value", values)
}
