use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tavola_core::{SeriesId, SeriesProvider, TavolaConnector, TavolaError};
use tavola_core::{RetryConfig, SeriesFrame, TavolaConfig};

use crate::router::backoff::backoff_delay_ms;

/// Orchestrator that fetches series from a connector and assembles aligned tables.
pub struct Tavola {
    pub(crate) connector: Arc<dyn TavolaConnector>,
    pub(crate) cfg: TavolaConfig,
}

/// Builder for constructing a `Tavola` orchestrator with custom configuration.
pub struct TavolaBuilder {
    connector: Option<Arc<dyn TavolaConnector>>,
    cfg: TavolaConfig,
}

impl Default for TavolaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TavolaBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no connector; you must register one via [`Self::with_connector`].
    /// - Defaults: 10s provider timeout, no request deadline, four calls in
    ///   flight, no retries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: TavolaConfig::default(),
        }
    }

    /// Register the provider connector. A later call replaces an earlier one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn TavolaConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration, e.g. one deserialized from a file.
    #[must_use]
    pub fn config(mut self, cfg: TavolaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the per-call provider timeout.
    ///
    /// A call that exceeds it drops only its own series, reported as a
    /// `ProviderTimeout` warning.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for the fan-out of one request.
    ///
    /// When exceeded the request fails with `RequestTimeout`, even if some
    /// series already arrived.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Maximum number of provider calls in flight at once.
    ///
    /// Higher values finish faster but are more likely to trip provider rate limits.
    #[must_use]
    pub const fn parallelism(mut self, n: usize) -> Self {
        self.cfg.parallelism = n;
        self
    }

    /// Retry transient provider errors (rate limits, server and network
    /// failures, per-call timeouts) with exponential backoff and jitter.
    #[must_use]
    pub const fn retry(mut self, retry: RetryConfig) -> Self {
        self.cfg.retry = Some(retry);
        self
    }

    /// Build the `Tavola` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if no connector was registered, the connector
    /// does not serve series, parallelism is zero, or the retry policy is
    /// malformed.
    pub fn build(self) -> Result<Tavola, TavolaError> {
        let Some(connector) = self.connector else {
            return Err(TavolaError::invalid_config(
                "no connector registered; add one via with_connector(...)",
            ));
        };
        if connector.as_series_provider().is_none() {
            return Err(TavolaError::invalid_config(format!(
                "connector '{}' does not serve series",
                connector.name()
            )));
        }
        if self.cfg.parallelism == 0 {
            return Err(TavolaError::invalid_config("parallelism must be at least 1"));
        }
        if let Some(retry) = &self.cfg.retry {
            let b = &retry.backoff;
            if retry.max_attempts == 0 {
                return Err(TavolaError::invalid_config(
                    "retry.max_attempts must be at least 1",
                ));
            }
            if b.factor == 0 || b.min_backoff_ms > b.max_backoff_ms || b.jitter_percent > 100 {
                return Err(TavolaError::invalid_config(format!(
                    "invalid backoff configuration: {b:?}"
                )));
            }
        }
        Ok(Tavola {
            connector,
            cfg: self.cfg,
        })
    }
}

/// Attach the series identifier to an error that lacks it.
///
/// Per-series variants, `Authentication`, and `InvalidConfig` pass through
/// unchanged; anything else is reported as a provider failure for `series`.
pub(crate) fn tag_err(connector: &str, series: &SeriesId, e: TavolaError) -> TavolaError {
    match e {
        e @ (TavolaError::InvalidConfig(_)
        | TavolaError::UnknownSeries { .. }
        | TavolaError::RateLimited { .. }
        | TavolaError::Provider { .. }
        | TavolaError::ProviderTimeout { .. }
        | TavolaError::MissingField { .. }
        | TavolaError::Authentication { .. }) => e,
        other => TavolaError::provider(connector, series.as_str(), other.to_string()),
    }
}

/// Run `fut` under an optional deadline, mapping expiry to `RequestTimeout`.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, TavolaError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| TavolaError::RequestTimeout),
        None => Ok(fut.await),
    }
}

impl Tavola {
    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tavola::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        series: &str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, TavolaError>
    where
        Fut: core::future::Future<Output = Result<T, TavolaError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(TavolaError::provider_timeout(connector_name, series)))
    }

    /// Fetch one frame, retrying transient errors when a retry policy is set.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tavola::core::fetch_frame",
            skip(self, provider),
            fields(series = %id),
        )
    )]
    pub(crate) async fn fetch_frame(
        &self,
        provider: &dyn SeriesProvider,
        id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SeriesFrame, TavolaError> {
        let name = self.connector.name();
        let max_attempts = self.cfg.retry.map_or(1, |r| r.max_attempts.max(1));
        let mut attempt = 1;
        loop {
            let res = Self::provider_call_with_timeout(
                name,
                id.as_str(),
                self.cfg.provider_timeout,
                provider.fetch_series(id, start, end),
            )
            .await;
            match (res, self.cfg.retry) {
                (Err(e), Some(retry)) if e.is_retryable() && attempt < max_attempts => {
                    let delay = backoff_delay_ms(&retry.backoff, attempt);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        series = %id,
                        attempt,
                        delay_ms = delay,
                        error = %e,
                        "retrying transient provider error"
                    );
                    #[cfg(not(feature = "tracing"))]
                    let _ = e;
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                (res, _) => return res,
            }
        }
    }

    /// Start building a new `Tavola` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use tavola_fred::FredConnector;
    ///
    /// let fred = Arc::new(FredConnector::new(std::env::var("FRED_API_KEY")?)?);
    /// let tavola = tavola::Tavola::builder()
    ///     .with_connector(fred)
    ///     .parallelism(2)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> TavolaBuilder {
        TavolaBuilder::new()
    }

    /// The registered connector.
    #[must_use]
    pub fn connector(&self) -> &Arc<dyn TavolaConnector> {
        &self.connector
    }

    /// The effective configuration.
    #[must_use]
    pub const fn config(&self) -> &TavolaConfig {
        &self.cfg
    }
}
