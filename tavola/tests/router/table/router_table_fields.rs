use tavola::{NormalizationMode, TavolaError};
use tavola_core::MARKET_CLOSE_FIELDS;
use tavola_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{close_frame, d, id, returns, tavola, value_frame, year_2024};

#[tokio::test]
async fn adjclose_preferred_then_close() {
    let (mock, ctrl) = DynamicMockConnector::new_with_fields(
        "market",
        MARKET_CLOSE_FIELDS,
        NormalizationMode::Daily,
    );
    returns(
        &ctrl,
        vec![
            close_frame("^DJI", &[(d(2024, 1, 2), 10.0), (d(2024, 1, 3), 12.0)], true),
            close_frame("^IXIC", &[(d(2024, 1, 2), 7.0), (d(2024, 1, 3), 8.0)], false),
        ],
    )
    .await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&["^DJI", "^IXIC"])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    let table = report.table().expect("table");
    assert_eq!(table.dates(), &[d(2024, 1, 2), d(2024, 1, 3)]);
    // adjusted close is half the close in the fixture
    assert_eq!(table.values("^DJI").unwrap(), &[Some(5.0), Some(6.0)]);
    assert_eq!(table.values("^IXIC").unwrap(), &[Some(7.0), Some(8.0)]);
}

#[tokio::test]
async fn override_selects_requested_field() {
    let (mock, ctrl) = DynamicMockConnector::new_with_fields(
        "market",
        MARKET_CLOSE_FIELDS,
        NormalizationMode::Daily,
    );
    returns(
        &ctrl,
        vec![close_frame(
            "^DJI",
            &[(d(2024, 1, 2), 10.0), (d(2024, 1, 3), 12.0)],
            true,
        )],
    )
    .await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .add_series("^DJI")
        .unwrap()
        .period(start, end)
        .value_fields(&["close"])
        .run()
        .await
        .unwrap();
    assert_eq!(
        report.table().unwrap().values("^DJI").unwrap(),
        &[Some(10.0), Some(12.0)]
    );
}

#[tokio::test]
async fn missing_field_drops_only_that_series() {
    let (mock, ctrl) = DynamicMockConnector::new_with_fields(
        "market",
        MARKET_CLOSE_FIELDS,
        NormalizationMode::Daily,
    );
    returns(
        &ctrl,
        vec![
            close_frame("^DJI", &[(d(2024, 1, 2), 10.0)], true),
            value_frame("UNRATE", &[(d(2024, 1, 1), Some(3.9))]),
        ],
    )
    .await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&["^DJI", "UNRATE"])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();

    assert!(report.is_partial());
    assert_eq!(report.dropped_series(), vec!["UNRATE"]);
    match &report.warnings[0] {
        TavolaError::MissingField { tried, .. } => {
            assert_eq!(tried, &vec!["adjclose".to_string(), "close".to_string()]);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn missing_values_still_contribute_dates() {
    let (mock, ctrl) = crate::helpers::dynamic("dyn");
    returns(
        &ctrl,
        vec![
            value_frame(
                "UMCSENT",
                &[
                    (d(2024, 1, 1), Some(70.0)),
                    (d(2024, 2, 1), None),
                    (d(2024, 3, 1), Some(75.0)),
                ],
            ),
            value_frame("UNRATE", &[(d(2024, 1, 1), Some(3.7))]),
        ],
    )
    .await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&["UMCSENT", "UNRATE"])
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();
    let table = report.table().unwrap();
    assert_eq!(table.row_count(), 3);
    assert_eq!(
        table.values("UMCSENT").unwrap(),
        &[Some(70.0), Some(70.0), Some(75.0)]
    );
    assert_eq!(table.values("UNRATE").unwrap(), &[Some(3.7); 3]);
}

#[tokio::test]
async fn frame_for_other_identifier_is_attributed_to_the_request() {
    let (mock, ctrl) = crate::helpers::dynamic("dyn");
    // provider echoes a frame keyed differently; the request identifier wins
    ctrl.set_behavior(
        id("A"),
        MockBehavior::Return(value_frame("Z", &[(d(2024, 1, 1), Some(1.0))])),
    )
    .await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .add_series("A")
        .unwrap()
        .period(start, end)
        .run()
        .await
        .unwrap();
    assert_eq!(report.table().unwrap().header(), vec!["date", "A"]);
}
