use std::sync::Arc;

use tavola::{Change, CsvExport, CsvOptions, NormalizationMode, Tavola};
use tavola_mock::MockConnector;

use crate::helpers::{A, B, d, dynamic, frame_a, frame_b, returns, tavola, year_2024};

#[tokio::test]
async fn aligns_month_start_and_fills_gaps() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a(), frame_b()]).await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .with_changes(true)
        .run()
        .await
        .unwrap();

    assert!(report.warnings.is_empty());
    assert!(!report.is_partial());
    let table = report.table().expect("table");
    assert_eq!(table.dates(), &[d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1)]);
    assert_eq!(table.values(A).unwrap(), &[Some(1.0), Some(1.0), Some(3.0)]);
    assert_eq!(table.values(B).unwrap(), &[Some(2.0), Some(2.0), Some(2.0)]);
    assert_eq!(table.header(), vec!["date", "A", "A-change", "B", "B-change"]);
    assert_eq!(table.changes(A).unwrap()[0], Change::Absent);
    assert_eq!(table.changes(A).unwrap()[2], Change::Value(200.0));
}

#[tokio::test]
async fn passes_range_to_provider() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a()]).await;

    tavola(mock)
        .table()
        .add_series(A)
        .unwrap()
        .period(d(2020, 1, 1), d(2024, 6, 30))
        .run()
        .await
        .unwrap();

    let calls = ctrl.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].start, d(2020, 1, 1));
    assert_eq!(calls[0].end, d(2024, 6, 30));
}

#[tokio::test]
async fn labels_rename_columns() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a(), frame_b()]).await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .add_labeled(A, "Alpha")
        .unwrap()
        .add_series(B)
        .unwrap()
        .label(B, "Beta")
        .unwrap()
        .period(start, end)
        .with_changes(true)
        .run()
        .await
        .unwrap();

    let table = report.into_table().expect("table");
    assert_eq!(
        table.header(),
        vec!["date", "Alpha", "Alpha-change", "Beta", "Beta-change"]
    );
    // values are still addressable by identifier
    assert!(table.values(A).is_some());
}

#[tokio::test]
async fn all_empty_is_empty_outcome_not_error() {
    let (mock, ctrl) = dynamic("dyn");
    returns(
        &ctrl,
        vec![
            crate::helpers::value_frame(A, &[]),
            crate::helpers::value_frame(B, &[]),
        ],
    )
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

    assert!(report.is_empty_result());
    assert!(report.table().is_none());
    assert!(report.warnings.is_empty());
    assert_eq!(report.empty_series.len(), 2);
}

#[tokio::test]
async fn empty_series_gets_no_column_but_is_reported() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a(), crate::helpers::value_frame(B, &[])]).await;
    let (start, end) = year_2024();

    let report = tavola(mock)
        .table()
        .series(&[A, B])
        .unwrap()
        .period(start, end)
        .with_changes(true)
        .run()
        .await
        .unwrap();

    let table = report.table().expect("table");
    assert_eq!(table.header(), vec!["date", "A", "A-change"]);
    assert_eq!(report.empty_series, vec![crate::helpers::id(B)]);
    assert!(!report.is_partial());
}

#[tokio::test]
async fn fixture_connector_end_to_end_csv() {
    let tavola = Tavola::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let report = tavola
        .table()
        .series(&["UNRATE", "GDP"])
        .unwrap()
        .period(d(2021, 1, 1), d(2021, 6, 30))
        .with_changes(true)
        .run()
        .await
        .unwrap();

    let table = report.table().expect("table");
    assert_eq!(table.row_count(), 6);
    // quarterly GDP is forward-filled onto the monthly axis
    assert!(table.values("GDP").unwrap().iter().all(Option::is_some));

    let first = table.to_csv_string(&CsvOptions::default()).unwrap();
    let second = tavola
        .table()
        .series(&["UNRATE", "GDP"])
        .unwrap()
        .period(d(2021, 1, 1), d(2021, 6, 30))
        .with_changes(true)
        .run()
        .await
        .unwrap()
        .into_table()
        .unwrap()
        .to_csv_string(&CsvOptions::default())
        .unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("date,UNRATE,UNRATE-change,GDP,GDP-change\n2021-01-01,"));
}

#[tokio::test]
async fn daily_connector_default_keeps_trading_days() {
    let tavola = Tavola::builder()
        .with_connector(Arc::new(
            MockConnector::new().with_normalization(NormalizationMode::Daily),
        ))
        .build()
        .unwrap();

    let report = tavola
        .table()
        .series(&["^DJI", "^GSPC"])
        .unwrap()
        .period(d(2024, 1, 1), d(2024, 1, 12))
        .run()
        .await
        .unwrap();
    // 2024-01-01 is a Monday: two full trading weeks
    assert_eq!(report.table().unwrap().row_count(), 10);

    let monthly = tavola
        .table()
        .series(&["^DJI", "^GSPC"])
        .unwrap()
        .period(d(2024, 1, 1), d(2024, 1, 12))
        .normalization(NormalizationMode::MonthStart)
        .run()
        .await
        .unwrap();
    assert_eq!(monthly.table().unwrap().dates(), &[d(2024, 1, 1)]);
}
