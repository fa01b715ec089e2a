use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tavola_core::{SeriesId, TavolaError};

use crate::CONNECTOR_NAME;

/// Production endpoint for series observations.
pub const OBSERVATIONS_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Parameters of one observations call, minus the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationsQuery {
    /// FRED series code.
    pub series_id: SeriesId,
    /// `observation_start`, inclusive.
    pub start: NaiveDate,
    /// `observation_end`, inclusive.
    pub end: NaiveDate,
}

/// Raw HTTP reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Observations transport (so we can inject canned replies in tests).
///
/// Implementations return the reply for any status; only transport failures
/// are errors.
#[async_trait]
pub trait FredObservations: Send + Sync {
    /// Perform the observations call.
    async fn observations(&self, query: &ObservationsQuery) -> Result<HttpReply, TavolaError>;
}

/// Production adapter backed by `reqwest`.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RealAdapter {
    /// Adapter for the public FRED endpoint.
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self::with_base_url(http, api_key, OBSERVATIONS_URL)
    }

    /// Adapter for a custom endpoint (proxies, mirrors).
    #[must_use]
    pub fn with_base_url(http: reqwest::Client, api_key: String, base_url: &str) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.to_string(),
        }
    }

    fn url_for(&self, query: &ObservationsQuery) -> Result<url::Url, TavolaError> {
        let start = query.start.format("%Y-%m-%d").to_string();
        let end = query.end.format("%Y-%m-%d").to_string();
        url::Url::parse_with_params(
            &self.base_url,
            &[
                ("series_id", query.series_id.as_str()),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
            ],
        )
        .map_err(|e| TavolaError::invalid_config(format!("invalid FRED base url: {e}")))
    }
}

fn map_transport_err(e: reqwest::Error, series: &SeriesId) -> TavolaError {
    // The URL carries the credential.
    let e = e.without_url();
    TavolaError::provider(CONNECTOR_NAME, series.as_str(), format!("transport: {e}"))
}

#[async_trait]
impl FredObservations for RealAdapter {
    async fn observations(&self, query: &ObservationsQuery) -> Result<HttpReply, TavolaError> {
        let url = self.url_for(query)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_transport_err(e, &query.series_id))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| map_transport_err(e, &query.series_id))?;
        Ok(HttpReply { status, body })
    }
}

impl dyn FredObservations {
    /// Build a `FredObservations` from a closure returning `(status, body)`.
    pub fn from_fn<F>(f: F) -> Arc<dyn FredObservations>
    where
        F: Send + Sync + 'static + Fn(&ObservationsQuery) -> Result<(u16, String), TavolaError>,
    {
        struct FnObs<F>(F);
        #[async_trait]
        impl<F> FredObservations for FnObs<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(&ObservationsQuery) -> Result<(u16, String), TavolaError>,
        {
            async fn observations(
                &self,
                query: &ObservationsQuery,
            ) -> Result<HttpReply, TavolaError> {
                let (status, body) = (self.0)(query)?;
                Ok(HttpReply { status, body })
            }
        }
        Arc::new(FnObs(f))
    }
}
