//! tavola-mock
//!
//! Connectors for tests and demos that never touch the network:
//! - `MockConnector`: deterministic fixture indicators and index closes, plus
//!   special identifiers that simulate provider failures.
//! - `DynamicMockConnector`: behavior scripted per identifier from a test
//!   through a `DynamicMockController`.
#![warn(missing_docs)]

use async_trait::async_trait;
use chrono::NaiveDate;
use tavola_core::connector::{SeriesProvider, TavolaConnector};
use tavola_core::{NormalizationMode, SeriesFrame, SeriesId, TavolaError};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior, RecordedCall};
pub use fixtures::{FIXTURE_END, FIXTURE_START};

/// Candidate value fields for mock frames: indicators carry `value`, markets
/// carry `adjclose` (except `^IXIC`) and `close`.
pub const MOCK_VALUE_FIELDS: &[&str] = &["value", "adjclose", "close"];

/// Mock connector for CI-safe demos. Provides deterministic data from static fixtures.
///
/// Indicator codes (`UNRATE`, `FEDFUNDS`, `UMCSENT`, `CPIAUCSL`, `GDP`) are
/// monthly; index tickers (`^DJI`, `^GSPC`, `^IXIC`) are daily on weekdays.
/// Fixtures cover 2018-01-01 through 2024-12-31.
///
/// Special identifiers simulate provider conditions:
/// - `FAIL`: provider error
/// - `TIMEOUT`: answers after 200ms
/// - `EMPTY`: no observations
/// - `LIMIT`: rate limited
/// - `BADKEY`: credential rejected
pub struct MockConnector {
    normalization: NormalizationMode,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Mock preferring month-start normalization.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            normalization: NormalizationMode::MonthStart,
        }
    }

    /// Change the normalization this connector advertises as its default.
    #[must_use]
    pub const fn with_normalization(mut self, mode: NormalizationMode) -> Self {
        self.normalization = mode;
        self
    }

    /// Every identifier with fixture data.
    #[must_use]
    pub fn known_series() -> Vec<&'static str> {
        fixtures::indicators::CODES
            .iter()
            .chain(fixtures::markets::TICKERS)
            .copied()
            .collect()
    }

    async fn maybe_fail_or_timeout(id: &SeriesId) -> Result<(), TavolaError> {
        match id.as_str() {
            "FAIL" => Err(TavolaError::provider(
                "tavola-mock",
                id.as_str(),
                "forced failure",
            )),
            "LIMIT" => Err(TavolaError::rate_limited("tavola-mock", id.as_str())),
            "BADKEY" => Err(TavolaError::authentication(
                "tavola-mock",
                "forced credential rejection",
            )),
            "TIMEOUT" => {
                // Short enough not to slow tests; the orchestrator may still time out
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl TavolaConnector for MockConnector {
    fn name(&self) -> &'static str {
        "tavola-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn default_normalization(&self) -> NormalizationMode {
        self.normalization
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for MockConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tavola_mock::fetch_series",
            skip(self),
            fields(series = %id, start = %start, end = %end),
        )
    )]
    async fn fetch_series(
        &self,
        id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SeriesFrame, TavolaError> {
        Self::maybe_fail_or_timeout(id).await?;
        match id.as_str() {
            "EMPTY" | "TIMEOUT" => Ok(SeriesFrame::empty(id.clone())),
            s if fixtures::indicators::CODES.contains(&s) => {
                fixtures::indicators::frame(id, start, end)
            }
            _ => fixtures::markets::frame(id, start, end),
        }
    }

    fn value_fields(&self) -> &'static [&'static str] {
        MOCK_VALUE_FIELDS
    }
}
