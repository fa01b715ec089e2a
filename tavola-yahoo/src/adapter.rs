use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tavola_core::{SeriesId, TavolaError};

use crate::CONNECTOR_NAME;

/// Production chart endpoint; the symbol is appended as a path segment.
pub const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Parameters of one daily chart call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    /// Ticker symbol, e.g. `^GSPC`.
    pub symbol: SeriesId,
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl ChartQuery {
    /// `period1`/`period2` epoch seconds. `period2` is exclusive upstream, so it
    /// points at midnight UTC after `end`.
    #[must_use]
    pub fn periods(&self) -> (i64, i64) {
        let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map_or(0, |t| t.and_utc().timestamp());
        let after_end = self.end.checked_add_days(Days::new(1)).unwrap_or(self.end);
        (midnight(self.start), midnight(after_end))
    }
}

/// Raw HTTP reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Chart transport. Non-success statuses are replies, not errors.
#[async_trait]
pub trait YahooChart: Send + Sync {
    /// Perform the chart call.
    async fn chart(&self, query: &ChartQuery) -> Result<HttpReply, TavolaError>;
}

/// Production adapter backed by `reqwest`.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl Default for RealAdapter {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl RealAdapter {
    /// Adapter for the public chart endpoint.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, CHART_URL)
    }

    /// Adapter for a custom endpoint.
    #[must_use]
    pub fn with_base_url(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, query: &ChartQuery) -> Result<url::Url, TavolaError> {
        let invalid = |e: String| TavolaError::invalid_config(format!("invalid chart url: {e}"));
        let mut url = url::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid(self.base_url.clone()))?
            .push(query.symbol.as_str());
        let (p1, p2) = query.periods();
        url.query_pairs_mut()
            .append_pair("period1", &p1.to_string())
            .append_pair("period2", &p2.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "div,splits");
        Ok(url)
    }
}

#[async_trait]
impl YahooChart for RealAdapter {
    async fn chart(&self, query: &ChartQuery) -> Result<HttpReply, TavolaError> {
        let url = self.url_for(query)?;
        let transport = |e: reqwest::Error| {
            TavolaError::provider(CONNECTOR_NAME, query.symbol.as_str(), format!("transport: {e}"))
        };
        let resp = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(transport)?;
        Ok(HttpReply { status, body })
    }
}

impl dyn YahooChart {
    /// Build a `YahooChart` from a closure returning `(status, body)`.
    pub fn from_fn<F>(f: F) -> Arc<dyn YahooChart>
    where
        F: Send + Sync + 'static + Fn(&ChartQuery) -> Result<(u16, String), TavolaError>,
    {
        struct FnChart<F>(F);
        #[async_trait]
        impl<F> YahooChart for FnChart<F>
        where
            F: Send + Sync + 'static + Fn(&ChartQuery) -> Result<(u16, String), TavolaError>,
        {
            async fn chart(&self, query: &ChartQuery) -> Result<HttpReply, TavolaError> {
                let (status, body) = (self.0)(query)?;
                Ok(HttpReply { status, body })
            }
        }
        Arc::new(FnChart(f))
    }
}
