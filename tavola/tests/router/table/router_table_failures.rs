use std::time::Duration;

use tavola::TavolaError;
use tavola_mock::MockBehavior;

use crate::helpers::{A, B, C, dynamic, frame_a, id, returns, tavola, year_2024};

#[tokio::test]
async fn partial_failure_lists_dropped_series() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a()]).await;
    ctrl.set_behavior(
        id(B),
        MockBehavior::Fail(TavolaError::provider("dyn", B, "500 Internal Server Error")),
    )
    .await;
    // C has no behavior: unknown series
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&[A, B, C])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert!(report.is_partial());
    assert_eq!(report.dropped_series(), vec![B, C]);
    assert!(matches!(report.warnings[1], TavolaError::UnknownSeries { .. }));
    assert_eq!(report.table().unwrap().header(), vec!["date", "A"]);
}

#[tokio::test]
async fn untagged_provider_error_is_attributed() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a()]).await;
    ctrl.set_behavior(id(B), MockBehavior::Fail(TavolaError::Data("garbled".into())))
        .await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    match &report.warnings[0] {
        TavolaError::Provider {
            provider,
            series,
            msg,
        } => {
            assert_eq!(provider, "dyn");
            assert_eq!(series, B);
            assert!(msg.contains("garbled"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn total_failure_is_an_error() {
    let (mock, ctrl) = dynamic("dyn");
    ctrl.set_behavior(id(A), MockBehavior::Fail(TavolaError::rate_limited("dyn", A)))
        .await;
    let (start, end) = year_2024();

    let err = tavola(mock)
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap_err();

    match err {
        TavolaError::AllSeriesFailed(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(matches!(errors[0], TavolaError::RateLimited { .. }));
            assert!(matches!(errors[1], TavolaError::UnknownSeries { .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn empty_and_failed_is_empty_with_warnings() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![crate::helpers::value_frame(A, &[])]).await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert!(report.is_empty_result());
    assert!(!report.is_partial());
    assert_eq!(report.dropped_series(), vec![B]);
}

#[tokio::test]
async fn authentication_failure_aborts_without_waiting() {
    let (mock, ctrl) = dynamic("dyn");
    // A hangs well past the test's patience; B rejects the credential.
    ctrl.set_behavior(id(A), MockBehavior::Hang).await;
    ctrl.set_behavior(
        id(B),
        MockBehavior::Fail(TavolaError::authentication("dyn", "api_key is not registered")),
    )
    .await;
    let (start, end) = year_2024();

    let tavola = tavola::Tavola::builder()
        .with_connector(mock)
        .provider_timeout(Duration::from_secs(30))
        .build()
        .unwrap();

    let res = tokio::time::timeout(
        Duration::from_secs(5),
        tavola.table().series(&[A, B]).unwrap().period(start, end).run(),
    )
    .await
    .expect("auth failure should abort the hanging fetch");

    assert!(matches!(res, Err(TavolaError::Authentication { .. })));
}
