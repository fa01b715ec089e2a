//! tavola-fred
//!
//! Connector for the Federal Reserve Economic Data (FRED) observations API.
//! Serves indicator codes such as `UNRATE` or `CPIAUCSL` as single-field frames
//! (`value`). FRED marks missing values with `"."`; those become absent
//! observations that still carry their date.
#![warn(missing_docs)]

/// Transport adapter and the production adapter backed by `reqwest`.
pub mod adapter;

use std::sync::Arc;

use adapter::{FredObservations, HttpReply, ObservationsQuery, RealAdapter};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tavola_core::connector::{ConnectorKey, SeriesProvider, TavolaConnector};
use tavola_core::{
    INDICATOR_VALUE_FIELDS, NormalizationMode, SeriesFrame, SeriesId, TavolaError,
};

pub(crate) const CONNECTOR_NAME: &str = "tavola-fred";

/// Environment variable the demos read the API key from.
pub const API_KEY_ENV: &str = "FRED_API_KEY";

/// Default indicator selection: unemployment, consumer sentiment, fed funds, CPI.
pub const DEFAULT_SERIES: &[&str] = &["UNRATE", "UMCSENT", "FEDFUNDS", "CPIAUCSL"];

/// Commonly requested codes with a short description.
pub const COMMON_SERIES: &[(&str, &str)] = &[
    ("UNRATE", "Civilian Unemployment Rate"),
    ("UMCSENT", "University of Michigan: Consumer Sentiment"),
    ("FEDFUNDS", "Effective Federal Funds Rate"),
    ("CPIAUCSL", "Consumer Price Index for All Urban Consumers: All Items"),
    ("GDP", "Gross Domestic Product"),
    ("GDPC1", "Real Gross Domestic Product"),
    ("PCE", "Personal Consumption Expenditures"),
    ("PCEDG", "Personal Consumption Expenditures: Durable Goods"),
    ("PSAVERT", "Personal Saving Rate"),
    ("M2SL", "M2 Money Stock"),
    ("M1SL", "M1 Money Stock"),
    ("DGS10", "10-Year Treasury Constant Maturity Rate"),
    ("DGS2", "2-Year Treasury Constant Maturity Rate"),
    ("T10Y2Y", "10-Year minus 2-Year Treasury Spread"),
    ("RECPROUSM156N", "Smoothed U.S. Recession Probabilities"),
    ("WALCL", "Federal Reserve Total Assets"),
];

#[derive(Deserialize)]
struct ObservationsBody {
    #[serde(default)]
    observations: Vec<ObservationRow>,
}

#[derive(Deserialize)]
struct ObservationRow {
    date: String,
    value: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_message: String,
}

/// Public connector type. Production users construct it with [`FredConnector::new`].
pub struct FredConnector {
    observations: Arc<dyn FredObservations>,
}

impl FredConnector {
    /// Static connector key.
    pub const KEY: ConnectorKey = ConnectorKey::new(CONNECTOR_NAME);

    /// Build against the public endpoint with a fresh HTTP client.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `api_key` is empty or blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, TavolaError> {
        Self::new_with_client(reqwest::Client::new(), api_key)
    }

    /// Build against the public endpoint with an existing HTTP client.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `api_key` is empty or blank.
    pub fn new_with_client(
        http: reqwest::Client,
        api_key: impl Into<String>,
    ) -> Result<Self, TavolaError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TavolaError::invalid_config("FRED API key must not be empty"));
        }
        Ok(Self::with_adapter(Arc::new(RealAdapter::new(http, api_key))))
    }

    /// Build with the key read from `FRED_API_KEY`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the variable is unset or blank.
    pub fn from_env() -> Result<Self, TavolaError> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| {
            TavolaError::invalid_config(format!("{API_KEY_ENV} is not set"))
        })?;
        Self::new(key)
    }

    /// Build from any observations adapter (tests inject canned replies here).
    #[must_use]
    pub fn with_adapter(observations: Arc<dyn FredObservations>) -> Self {
        Self { observations }
    }

    fn looks_like_key_problem(msg: &str) -> bool {
        msg.to_ascii_lowercase().contains("api_key")
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error_message)
            .unwrap_or_else(|_| body.chars().take(200).collect())
    }

    fn map_status(reply: &HttpReply, id: &SeriesId) -> TavolaError {
        let msg = Self::error_message(&reply.body);
        match reply.status {
            400 if Self::looks_like_key_problem(&msg) => {
                TavolaError::authentication(CONNECTOR_NAME, msg)
            }
            401 | 403 => TavolaError::authentication(CONNECTOR_NAME, msg),
            400 | 404 => TavolaError::unknown_series(id.as_str()),
            429 => TavolaError::rate_limited(CONNECTOR_NAME, id.as_str()),
            status => TavolaError::provider(
                CONNECTOR_NAME,
                id.as_str(),
                format!("HTTP {status}: {msg}"),
            ),
        }
    }

    fn parse_frame(id: &SeriesId, body: &str) -> Result<SeriesFrame, TavolaError> {
        let malformed =
            |what: String| TavolaError::provider(CONNECTOR_NAME, id.as_str(), what);
        let body: ObservationsBody = serde_json::from_str(body)
            .map_err(|e| malformed(format!("malformed response: {e}")))?;

        let mut dates = Vec::with_capacity(body.observations.len());
        let mut values = Vec::with_capacity(body.observations.len());
        for row in body.observations {
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .map_err(|e| malformed(format!("bad date '{}': {e}", row.date)))?;
            let value = match row.value.trim() {
                "." | "" => None,
                v => Some(
                    v.parse::<f64>()
                        .map_err(|e| malformed(format!("bad value '{v}' at {date}: {e}")))?,
                ),
            };
            dates.push(date);
            values.push(value);
        }
        SeriesFrame::new(id.clone(), dates).with_field("value", values)
    }
}

impl TavolaConnector for FredConnector {
    fn name(&self) -> &'static str {
        CONNECTOR_NAME
    }

    fn vendor(&self) -> &'static str {
        "Federal Reserve Bank of St. Louis"
    }

    fn default_normalization(&self) -> NormalizationMode {
        NormalizationMode::MonthStart
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for FredConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tavola_fred::fetch_series",
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
        let query = ObservationsQuery {
            series_id: id.clone(),
            start,
            end,
        };
        let reply = self.observations.observations(&query).await?;
        if !(200..300).contains(&reply.status) {
            let err = Self::map_status(&reply, id);
            #[cfg(feature = "tracing")]
            tracing::debug!(status = reply.status, error = %err, "FRED call rejected");
            return Err(err);
        }
        Self::parse_frame(id, &reply.body)
    }

    fn value_fields(&self) -> &'static [&'static str] {
        INDICATOR_VALUE_FIELDS
    }
}
