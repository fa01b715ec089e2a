use std::time::Duration;

use tavola::{Tavola, TavolaError};
use tavola_mock::MockBehavior;

use crate::helpers::{A, B, dynamic, frame_a, frame_b, id, returns, year_2024};

#[tokio::test]
async fn provider_timeout_isolates_the_slow_series() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a()]).await;
    ctrl.set_behavior(id(B), MockBehavior::Hang).await;
    let (start, end) = year_2024();

    let tavola = Tavola::builder()
        .with_connector(mock)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let report = tavola
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert!(report.is_partial());
    match &report.warnings[0] {
        TavolaError::ProviderTimeout { provider, series } => {
            assert_eq!(provider, "dyn");
            assert_eq!(series, B);
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(report.table().unwrap().header(), vec!["date", "A"]);
}

#[tokio::test]
async fn request_deadline_fails_the_whole_request() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a()]).await;
    ctrl.set_behavior(id(B), MockBehavior::Hang).await;
    let (start, end) = year_2024();

    let tavola = Tavola::builder()
        .with_connector(mock)
        .provider_timeout(Duration::from_secs(30))
        .request_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = tavola
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap_err();
    assert_eq!(err, TavolaError::RequestTimeout);
    assert!(err.is_fatal());
}

#[tokio::test]
async fn slow_but_in_time_series_are_kept() {
    let (mock, ctrl) = dynamic("dyn");
    ctrl.set_behavior(
        id(A),
        MockBehavior::ReturnAfter(Duration::from_millis(20), frame_a()),
    )
    .await;
    returns(&ctrl, vec![frame_b()]).await;
    let (start, end) = year_2024();

    let tavola = Tavola::builder()
        .with_connector(mock)
        .provider_timeout(Duration::from_millis(500))
        .request_timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let report = tavola
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.table().unwrap().header(), vec!["date", "A", "B"]);
}
