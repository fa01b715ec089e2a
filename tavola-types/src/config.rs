//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How observation dates are normalized onto the common axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizationMode {
    /// Truncate every date to the first day of its month (economic indicators).
    #[default]
    MonthStart,
    /// Use dates as reported (daily market data).
    Daily,
}

/// Exponential backoff configuration for retrying transient provider errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor to increase delay after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 500,
            max_backoff_ms: 30_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

/// Bounded retry around transient provider errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per series, including the first (>= 1).
    pub max_attempts: u32,
    /// Delay schedule between attempts.
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Global configuration for the `Tavola` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavolaConfig {
    /// Timeout for each individual provider call.
    pub provider_timeout: Duration,
    /// Optional deadline for the whole fan-out of a request.
    pub request_timeout: Option<Duration>,
    /// Maximum number of provider calls in flight at once.
    pub parallelism: usize,
    /// Optional retry policy for transient errors. `None` disables retries.
    pub retry: Option<RetryConfig>,
}

impl Default for TavolaConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            request_timeout: None,
            parallelism: 4,
            retry: None,
        }
    }
}
