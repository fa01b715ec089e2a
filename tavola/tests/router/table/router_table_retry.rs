use std::sync::Arc;
use std::time::Duration;

use tavola::{BackoffConfig, RetryConfig, Tavola, TavolaConnector, TavolaError};
use tavola_mock::MockBehavior;

use crate::helpers::{A, B, dynamic, frame_a, frame_b, id, returns, year_2024};

const FAST: RetryConfig = RetryConfig {
    max_attempts: 3,
    backoff: BackoffConfig {
        min_backoff_ms: 1,
        max_backoff_ms: 5,
        factor: 2,
        jitter_percent: 0,
    },
};

fn with_retry(mock: Arc<dyn TavolaConnector>, retry: Option<RetryConfig>) -> Tavola {
    let builder = Tavola::builder()
        .with_connector(mock)
        .provider_timeout(Duration::from_millis(100));
    let builder = match retry {
        Some(r) => builder.retry(r),
        None => builder,
    };
    builder.build().unwrap()
}

#[tokio::test]
async fn retry_recovers_transient_errors() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_b()]).await;
    ctrl.set_sequence(
        id(A),
        vec![
            MockBehavior::Fail(TavolaError::rate_limited("dyn", A)),
            MockBehavior::Hang,
            MockBehavior::Return(frame_a()),
        ],
    )
    .await;
    let (start, end) = year_2024();

    let report = with_retry(mock, Some(FAST))
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(ctrl.call_count(&id(A)).await, 3);
    assert_eq!(ctrl.call_count(&id(B)).await, 1);
    assert_eq!(report.table().unwrap().header(), vec!["date", "A", "B"]);
}

#[tokio::test]
async fn without_retry_transient_error_is_a_warning() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_b()]).await;
    ctrl.set_sequence(
        id(A),
        vec![
            MockBehavior::Fail(TavolaError::rate_limited("dyn", A)),
            MockBehavior::Return(frame_a()),
        ],
    )
    .await;
    let (start, end) = year_2024();

    let report = with_retry(mock, None)
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert_eq!(report.dropped_series(), vec![A]);
    assert_eq!(ctrl.call_count(&id(A)).await, 1);
}

#[tokio::test]
async fn attempts_are_bounded() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_b()]).await;
    ctrl.set_behavior(
        id(A),
        MockBehavior::Fail(TavolaError::provider("dyn", A, "503 Service Unavailable")),
    )
    .await;
    let (start, end) = year_2024();

    let report = with_retry(mock, Some(FAST))
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert_eq!(ctrl.call_count(&id(A)).await, 3);
    assert!(matches!(report.warnings[0], TavolaError::Provider { .. }));
}

#[tokio::test]
async fn permanent_errors_are_not_retried() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_b()]).await;
    // A: no behavior → unknown series
    let (start, end) = year_2024();

    let report = with_retry(mock, Some(FAST))
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();
    assert_eq!(ctrl.call_count(&id(A)).await, 1);
    assert!(matches!(report.warnings[0], TavolaError::UnknownSeries { .. }));
}

#[tokio::test]
async fn authentication_is_not_retried() {
    let (mock, ctrl) = dynamic("dyn");
    ctrl.set_behavior(
        id(A),
        MockBehavior::Fail(TavolaError::authentication("dyn", "bad key")),
    )
    .await;
    let (start, end) = year_2024();

    let err = with_retry(mock, Some(FAST))
        .table()
        .add_series(A)
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, TavolaError::Authentication { .. }));
    assert_eq!(ctrl.call_count(&id(A)).await, 1);
}

#[tokio::test]
async fn connector_config_errors_pass_through_without_retry() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_b()]).await;
    ctrl.set_behavior(
        id(A),
        MockBehavior::Fail(TavolaError::invalid_config("invalid chart url: relative URL")),
    )
    .await;
    let (start, end) = year_2024();

    let report = with_retry(mock, Some(FAST))
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert_eq!(ctrl.call_count(&id(A)).await, 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(report.warnings[0], TavolaError::InvalidConfig(_)));
    assert!(!report.warnings[0].is_retryable());
    assert_eq!(report.table().unwrap().header(), vec!["date", "B"]);
}
