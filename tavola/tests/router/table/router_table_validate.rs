use std::sync::Arc;

use tavola::{BackoffConfig, RetryConfig, TableRequest, Tavola, TavolaConnector, TavolaError};

use crate::helpers::{A, B, d, dynamic, frame_a, frame_b, id, returns, tavola, year_2024};

fn is_invalid<T: std::fmt::Debug>(r: Result<T, TavolaError>) -> bool {
    matches!(r, Err(TavolaError::InvalidConfig(_)))
}

struct NoSeries;

impl TavolaConnector for NoSeries {
    fn name(&self) -> &'static str {
        "no-series"
    }
}

#[test]
fn build_requires_a_series_connector() {
    assert!(is_invalid(Tavola::builder().build().map(|_| ())));
    assert!(is_invalid(
        Tavola::builder()
            .with_connector(Arc::new(NoSeries))
            .build()
            .map(|_| ())
    ));
}

#[test]
fn build_rejects_bad_limits() {
    let (mock, _ctrl) = dynamic("dyn");
    assert!(is_invalid(
        Tavola::builder()
            .with_connector(mock.clone())
            .parallelism(0)
            .build()
            .map(|_| ())
    ));
    assert!(is_invalid(
        Tavola::builder()
            .with_connector(mock.clone())
            .retry(RetryConfig {
                max_attempts: 0,
                backoff: BackoffConfig::default(),
            })
            .build()
            .map(|_| ())
    ));
    assert!(is_invalid(
        Tavola::builder()
            .with_connector(mock)
            .retry(RetryConfig {
                max_attempts: 2,
                backoff: BackoffConfig {
                    min_backoff_ms: 10,
                    max_backoff_ms: 1,
                    factor: 2,
                    jitter_percent: 0,
                },
            })
            .build()
            .map(|_| ())
    ));
}

#[test]
fn builder_rejects_bad_identifiers_eagerly() {
    let (mock, _ctrl) = dynamic("dyn");
    let t = tavola(mock);
    assert!(is_invalid(t.table().series(&[A, A]).map(|_| ())));
    assert!(is_invalid(t.table().series(&[A, ""]).map(|_| ())));
    assert!(is_invalid(
        t.table()
            .add_series(A)
            .and_then(|b| b.add_series(A))
            .map(|_| ())
    ));
    assert!(is_invalid(t.table().add_labeled(A, "").map(|_| ())));
    assert!(is_invalid(t.table().label(A, "Alpha").map(|_| ())));
}

#[tokio::test]
async fn run_validates_before_fetching() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a(), frame_b()]).await;
    let t = tavola(mock);
    let (start, end) = year_2024();

    // no series
    assert!(is_invalid(t.table().period(start, end).run().await));
    // no period
    assert!(is_invalid(t.table().series(&[A]).unwrap().run().await));
    // reversed range
    assert!(is_invalid(
        t.table()
            .series(&[A, B])
            .unwrap()
            .period(end, start)
            .run()
            .await
    ));
    // colliding labels
    assert!(is_invalid(
        t.table()
            .add_labeled(A, "X")
            .unwrap()
            .add_labeled(B, "X")
            .unwrap()
            .period(start, end)
            .run()
            .await
    ));
    // empty field override
    assert!(is_invalid(
        t.table()
            .series(&[A])
            .unwrap()
            .period(start, end)
            .value_fields(&[])
            .run()
            .await
    ));

    assert!(ctrl.calls().await.is_empty());
}

#[tokio::test]
async fn fetch_table_accepts_a_prepared_request() {
    let (mock, ctrl) = dynamic("dyn");
    returns(&ctrl, vec![frame_a()]).await;
    let mut req = TableRequest::new(
        vec![tavola::SeriesSpec::new(id(A))],
        d(2024, 1, 1),
        d(2024, 3, 31),
    );
    req.with_changes = true;

    let report = tavola(mock).fetch_table(&req).await.unwrap();
    assert_eq!(report.table().unwrap().header(), vec!["date", "A", "A-change"]);
}
