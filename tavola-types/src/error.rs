use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tavola workspace.
///
/// Per-series variants carry the identifier they were raised for so a batch can
/// report them as warnings without losing attribution. Batch-level variants
/// (`InvalidConfig`, `Authentication`, `AllSeriesFailed`, `RequestTimeout`) abort
/// the whole request.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TavolaError {
    /// The request or builder configuration is invalid; raised before any fetch.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The provider rejected the credential. Fatal for the whole batch.
    #[error("{provider} authentication failed: {msg}")]
    Authentication {
        /// Connector name that rejected the credential.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The provider does not know the requested series identifier.
    #[error("{series}: unknown series")]
    UnknownSeries {
        /// Identifier that could not be resolved.
        series: String,
    },

    /// The provider throttled the request.
    #[error("{series}: rate limited by {provider}")]
    RateLimited {
        /// Connector name that throttled the call.
        provider: String,
        /// Identifier being fetched.
        series: String,
    },

    /// A provider call failed (network, server error, malformed payload).
    #[error("{series}: {provider} failed: {msg}")]
    Provider {
        /// Connector name that failed.
        provider: String,
        /// Identifier being fetched.
        series: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A provider call exceeded the configured per-call timeout.
    #[error("{series}: provider timed out via {provider}")]
    ProviderTimeout {
        /// Connector name that timed out.
        provider: String,
        /// Identifier being fetched.
        series: String,
    },

    /// None of the candidate value fields were present in the provider frame.
    #[error("{series}: no value field present (tried {tried:?})")]
    MissingField {
        /// Identifier whose frame lacked every candidate.
        series: String,
        /// Candidate field names tried, in priority order.
        tried: Vec<String>,
    },

    /// Issues with the returned or expected data (mismatched lengths, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Every requested series failed; contains the individual failures.
    #[error("all series failed: {0:?}")]
    AllSeriesFailed(Vec<TavolaError>),

    /// The overall request exceeded the configured deadline.
    #[error("request timed out")]
    RequestTimeout,

    /// Writing the exported table failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl TavolaError {
    /// Helper: build an `InvalidConfig` error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Helper: build an `Authentication` error.
    pub fn authentication(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `UnknownSeries` error.
    pub fn unknown_series(series: impl Into<String>) -> Self {
        Self::UnknownSeries {
            series: series.into(),
        }
    }

    /// Helper: build a `RateLimited` error.
    pub fn rate_limited(provider: impl Into<String>, series: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            series: series.into(),
        }
    }

    /// Helper: build a `Provider` error.
    pub fn provider(
        provider: impl Into<String>,
        series: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            series: series.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(provider: impl Into<String>, series: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
            series: series.into(),
        }
    }

    /// Identifier this error was raised for, if it is a per-series error.
    #[must_use]
    pub fn series(&self) -> Option<&str> {
        match self {
            Self::UnknownSeries { series }
            | Self::RateLimited { series, .. }
            | Self::Provider { series, .. }
            | Self::ProviderTimeout { series, .. }
            | Self::MissingField { series, .. } => Some(series),
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Authentication failures, unknown identifiers, and missing fields are
    /// permanent for the lifetime of a request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Provider { .. } | Self::ProviderTimeout { .. }
        )
    }

    /// Whether this error aborts the whole batch rather than a single series.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_)
                | Self::Authentication { .. }
                | Self::AllSeriesFailed(_)
                | Self::RequestTimeout
        )
    }

    /// Flatten nested `AllSeriesFailed` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllSeriesFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
