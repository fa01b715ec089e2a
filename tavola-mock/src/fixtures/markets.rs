use chrono::NaiveDate;
use tavola_core::{SeriesFrame, SeriesId, TavolaError};

use super::trading_days;

/// Index tickers served by the mock.
pub const TICKERS: &[&str] = &["^DJI", "^GSPC", "^IXIC"];

fn base(ticker: &str) -> Option<f64> {
    match ticker {
        "^DJI" => Some(25_000.0),
        "^GSPC" => Some(2_700.0),
        "^IXIC" => Some(7_000.0),
        _ => None,
    }
}

/// Daily OHLCV frame. `^IXIC` carries no `adjclose`, so consumers fall back to `close`.
pub fn frame(id: &SeriesId, start: NaiveDate, end: NaiveDate) -> Result<SeriesFrame, TavolaError> {
    let Some(b) = base(id.as_str()) else {
        return Err(TavolaError::unknown_series(id.as_str()));
    };
    let days = trading_days(start, end);
    let dates: Vec<NaiveDate> = days.iter().map(|(_, d)| *d).collect();

    let close: Vec<Option<f64>> = days
        .iter()
        .map(|(i, _)| Some(b * (1.0 + (*i % 50) as f64 / 1_000.0)))
        .collect();
    let adjclose: Vec<Option<f64>> = close.iter().map(|c| c.map(|v| v * 0.99)).collect();
    let open: Vec<Option<f64>> = close.iter().map(|c| c.map(|v| v - 5.0)).collect();
    let high: Vec<Option<f64>> = close.iter().map(|c| c.map(|v| v + 10.0)).collect();
    let low: Vec<Option<f64>> = close.iter().map(|c| c.map(|v| v - 10.0)).collect();
    let volume: Vec<Option<f64>> = vec![Some(1_000_000.0); dates.len()];

    let mut frame = SeriesFrame::new(id.clone(), dates)
        .with_field("close", close)?
        .with_field("open", open)?
        .with_field("high", high)?
        .with_field("low", low)?
        .with_field("volume", volume)?;
    if id.as_str() != "^IXIC" {
        frame = frame.with_field("adjclose", adjclose)?;
    }
    Ok(frame)
}
