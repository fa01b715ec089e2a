use async_trait::async_trait;
use chrono::NaiveDate;

pub use tavola_types::ConnectorKey;
use tavola_types::{NormalizationMode, SeriesFrame, SeriesId, TavolaError};

/// Focused role trait for connectors that serve dated series observations.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetch the provider frame for `id` over the inclusive range `[start, end]`.
    ///
    /// An identifier with no observations in range yields an empty frame, not an
    /// error. Errors distinguish rate limiting (`RateLimited`), unknown
    /// identifiers (`UnknownSeries`), and rejected credentials (`Authentication`).
    async fn fetch_series(
        &self,
        id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SeriesFrame, TavolaError>;

    /// Candidate value fields in priority order; the first present in a frame wins.
    fn value_fields(&self) -> &'static [&'static str];
}

/// Primary connector interface: names the provider and advertises capabilities.
pub trait TavolaConnector: Send + Sync {
    /// A stable identifier used in logs and error attribution (e.g. "tavola-fred").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Calendar normalization that suits this provider's native cadence.
    ///
    /// Requests that do not choose a mode explicitly use this one.
    fn default_normalization(&self) -> NormalizationMode {
        NormalizationMode::MonthStart
    }

    /// Advertise series capability by returning a usable trait object reference when supported.
    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        None
    }
}
