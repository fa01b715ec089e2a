use rand::Rng;
use tavola_core::BackoffConfig;

/// Add up to `jitter_percent` of `base_ms` as random jitter.
pub fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, (base_ms.saturating_mul(u64::from(jitter_percent))) / 100)
    };
    let mut rng = rand::rng();
    base_ms.saturating_add(rng.random_range(0..jitter_range))
}

/// Delay before retry number `attempt` (1-based), jitter included.
///
/// The base grows as `min_backoff_ms * factor^(attempt-1)` and is capped at
/// `max_backoff_ms` before jitter is applied.
pub fn backoff_delay_ms(cfg: &BackoffConfig, attempt: u32) -> u64 {
    let growth = u64::from(cfg.factor).saturating_pow(attempt.saturating_sub(1));
    let base = cfg
        .min_backoff_ms
        .saturating_mul(growth)
        .min(cfg.max_backoff_ms);
    jitter_wait(base, u32::from(cfg.jitter_percent))
}
