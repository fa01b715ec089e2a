//! tavola-yahoo
//!
//! Connector for Yahoo Finance daily charts. Frames carry `adjclose`, `close`,
//! `open`, `high`, `low`, and `volume`; tables prefer the adjusted close and
//! fall back to the raw close for symbols without adjustments (indices).
#![warn(missing_docs)]

/// Transport adapter and the production adapter backed by `reqwest`.
pub mod adapter;

use std::sync::Arc;

use adapter::{ChartQuery, HttpReply, RealAdapter, YahooChart};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tavola_core::connector::{ConnectorKey, SeriesProvider, TavolaConnector};
use tavola_core::{MARKET_CLOSE_FIELDS, NormalizationMode, SeriesFrame, SeriesId, TavolaError};

pub(crate) const CONNECTOR_NAME: &str = "tavola-yahoo";

/// Default index set: Dow Jones Industrial Average, S&P 500, NASDAQ Composite.
pub const DEFAULT_SYMBOLS: &[&str] = &["^DJI", "^GSPC", "^IXIC"];

/// Well-known index symbols and their conventional column labels.
pub const INDEX_LABELS: &[(&str, &str)] =
    &[("^DJI", "DJIA"), ("^GSPC", "SP500"), ("^IXIC", "NASDAQ")];

/// Conventional label for a well-known index symbol.
#[must_use]
pub fn index_label(symbol: &str) -> Option<&'static str> {
    INDEX_LABELS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, label)| *label)
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Deserialize, Default)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Default)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
    #[serde(default)]
    adjclose: Vec<AdjCloseBlock>,
}

#[derive(Deserialize, Default)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Default)]
struct AdjCloseBlock {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Public connector type. Production users construct it with [`YahooConnector::new`].
pub struct YahooConnector {
    chart: Arc<dyn YahooChart>,
}

impl Default for YahooConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooConnector {
    /// Static connector key.
    pub const KEY: ConnectorKey = ConnectorKey::new(CONNECTOR_NAME);

    /// Build against the public endpoint with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_adapter(Arc::new(RealAdapter::default()))
    }

    /// Build against the public endpoint with an existing HTTP client.
    #[must_use]
    pub fn new_with_client(http: reqwest::Client) -> Self {
        Self::with_adapter(Arc::new(RealAdapter::new(http)))
    }

    /// Build from any chart adapter (tests inject canned replies here).
    #[must_use]
    pub fn with_adapter(chart: Arc<dyn YahooChart>) -> Self {
        Self { chart }
    }

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data")
    }

    fn chart_error(body: &str) -> Option<ChartError> {
        serde_json::from_str::<ChartEnvelope>(body)
            .ok()
            .and_then(|env| env.chart.error)
    }

    fn map_chart_error(err: &ChartError, id: &SeriesId) -> TavolaError {
        if Self::looks_like_not_found(&err.code) || Self::looks_like_not_found(&err.description) {
            TavolaError::unknown_series(id.as_str())
        } else {
            TavolaError::provider(
                CONNECTOR_NAME,
                id.as_str(),
                format!("{}: {}", err.code, err.description),
            )
        }
    }

    fn map_status(reply: &HttpReply, id: &SeriesId) -> TavolaError {
        match reply.status {
            404 => TavolaError::unknown_series(id.as_str()),
            401 | 403 => TavolaError::authentication(
                CONNECTOR_NAME,
                format!("HTTP {} for {id}", reply.status),
            ),
            429 => TavolaError::rate_limited(CONNECTOR_NAME, id.as_str()),
            status => match Self::chart_error(&reply.body) {
                Some(err) if Self::looks_like_not_found(&err.code) => {
                    TavolaError::unknown_series(id.as_str())
                }
                Some(err) => TavolaError::provider(
                    CONNECTOR_NAME,
                    id.as_str(),
                    format!("HTTP {status}: {}: {}", err.code, err.description),
                ),
                None => TavolaError::provider(CONNECTOR_NAME, id.as_str(), format!("HTTP {status}")),
            },
        }
    }

    fn parse_frame(
        id: &SeriesId,
        body: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SeriesFrame, TavolaError> {
        let malformed = |what: String| TavolaError::provider(CONNECTOR_NAME, id.as_str(), what);
        let env: ChartEnvelope = serde_json::from_str(body)
            .map_err(|e| malformed(format!("malformed response: {e}")))?;
        if let Some(err) = &env.chart.error {
            return Err(Self::map_chart_error(err, id));
        }
        let Some(result) = env.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(SeriesFrame::empty(id.clone()));
        };

        let n = result.timestamp.len();
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let adj = result.indicators.adjclose.into_iter().next().unwrap_or_default();
        let fields = [
            ("adjclose", adj.adjclose),
            ("close", quote.close),
            ("open", quote.open),
            ("high", quote.high),
            ("low", quote.low),
            ("volume", quote.volume),
        ];
        for (name, values) in &fields {
            if !values.is_empty() && values.len() != n {
                return Err(malformed(format!(
                    "field '{name}' has {} values for {n} timestamps",
                    values.len()
                )));
            }
        }

        // Keep rows whose exchange-local date lies in the requested range.
        let mut keep = Vec::with_capacity(n);
        let mut dates = Vec::with_capacity(n);
        for (row, ts) in result.timestamp.iter().enumerate() {
            let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)
                .ok_or_else(|| malformed(format!("bad timestamp {ts}")))?
                .date_naive();
            if (start..=end).contains(&date) {
                keep.push(row);
                dates.push(date);
            }
        }

        let mut frame = SeriesFrame::new(id.clone(), dates);
        for (name, values) in fields {
            if values.is_empty() {
                continue;
            }
            let kept = keep.iter().map(|&row| values[row]).collect();
            frame = frame.with_field(name, kept)?;
        }
        Ok(frame)
    }
}

impl TavolaConnector for YahooConnector {
    fn name(&self) -> &'static str {
        CONNECTOR_NAME
    }

    fn vendor(&self) -> &'static str {
        "Yahoo Finance"
    }

    fn default_normalization(&self) -> NormalizationMode {
        NormalizationMode::Daily
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for YahooConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tavola_yahoo::fetch_series",
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
        let query = ChartQuery {
            symbol: id.clone(),
            start,
            end,
        };
        let reply = self.chart.chart(&query).await?;
        if !(200..300).contains(&reply.status) {
            let err = Self::map_status(&reply, id);
            #[cfg(feature = "tracing")]
            tracing::debug!(status = reply.status, error = %err, "chart call rejected");
            return Err(err);
        }
        Self::parse_frame(id, &reply.body, start, end)
    }

    fn value_fields(&self) -> &'static [&'static str] {
        MARKET_CLOSE_FIELDS
    }
}
