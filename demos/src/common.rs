use std::sync::Arc;

use chrono::NaiveDate;
use tavola_core::TavolaConnector;

/// Set to any value to run demos against the fixture connector.
pub const USE_MOCK_ENV: &str = "TAVOLA_DEMOS_USE_MOCK";

fn use_mock() -> bool {
    std::env::var(USE_MOCK_ENV).is_ok()
}

/// Connector for indicator demos: FRED when a key is configured, the mock otherwise.
#[must_use]
pub fn indicator_connector() -> Arc<dyn TavolaConnector> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        return Arc::new(tavola_mock::MockConnector::new());
    }
    match tavola_fred::FredConnector::from_env() {
        Ok(fred) => Arc::new(fred),
        Err(e) => {
            println!("--- ({e}; falling back to Mock Connector) ---");
            Arc::new(tavola_mock::MockConnector::new())
        }
    }
}

/// Connector for market demos: Yahoo Finance unless the mock is requested.
#[must_use]
pub fn market_connector() -> Arc<dyn TavolaConnector> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        Arc::new(
            tavola_mock::MockConnector::new()
                .with_normalization(tavola_core::NormalizationMode::Daily),
        )
    } else {
        Arc::new(tavola_yahoo::YahooConnector::new())
    }
}

/// Last day to request: today, clamped to the fixture range under the mock.
#[must_use]
pub fn end_date() -> NaiveDate {
    let today = chrono::Local::now().date_naive();
    if use_mock() {
        today.min(tavola_mock::FIXTURE_END)
    } else {
        today
    }
}

/// Output path from the first CLI argument, or `default`.
#[must_use]
pub fn output_path(default: &str) -> String {
    std::env::args().nth(1).unwrap_or_else(|| default.to_string())
}
