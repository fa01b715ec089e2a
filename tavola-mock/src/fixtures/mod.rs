pub mod indicators;
pub mod markets;

use chrono::{Datelike, NaiveDate, Weekday};

/// First date covered by the fixtures.
pub const FIXTURE_START: NaiveDate = match NaiveDate::from_ymd_opt(2018, 1, 1) {
    Some(d) => d,
    None => panic!("valid fixture start"),
};

/// Last date covered by the fixtures.
pub const FIXTURE_END: NaiveDate = match NaiveDate::from_ymd_opt(2024, 12, 31) {
    Some(d) => d,
    None => panic!("valid fixture end"),
};

/// Month starts in `[start, end]` clipped to the fixture window, with a running index.
pub fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<(usize, NaiveDate)> {
    let from = start.max(FIXTURE_START);
    let to = end.min(FIXTURE_END);
    FIXTURE_START
        .iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| d.day() == 1)
        .enumerate()
        .filter(|(_, d)| *d >= from)
        .collect()
}

/// Weekdays in `[start, end]` clipped to the fixture window, with a running index.
pub fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<(usize, NaiveDate)> {
    let from = start.max(FIXTURE_START);
    let to = end.min(FIXTURE_END);
    FIXTURE_START
        .iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .filter(|(_, d)| *d >= from)
        .collect()
}
