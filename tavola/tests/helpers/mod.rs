#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tavola::{SeriesFrame, SeriesId, Tavola, TavolaConnector};
use tavola_mock::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Common identifiers used across tests.
pub const A: &str = "A";
pub const B: &str = "B";
pub const C: &str = "C";

/// Construct a date without unwrap noise in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
}

/// Construct an identifier with infallible expectations.
pub fn id(s: &str) -> SeriesId {
    SeriesId::new(s).expect("valid test identifier")
}

/// Indicator-style frame with a single `value` field.
pub fn value_frame(s: &str, rows: &[(NaiveDate, Option<f64>)]) -> SeriesFrame {
    let dates = rows.iter().map(|(d, _)| *d).collect();
    let values = rows.iter().map(|(_, v)| *v).collect();
    SeriesFrame::new(id(s), dates)
        .with_field("value", values)
        .expect("aligned fixture")
}

/// Market-style frame with `close` and optionally `adjclose`.
pub fn close_frame(s: &str, rows: &[(NaiveDate, f64)], with_adj: bool) -> SeriesFrame {
    let dates: Vec<NaiveDate> = rows.iter().map(|(d, _)| *d).collect();
    let close: Vec<Option<f64>> = rows.iter().map(|(_, v)| Some(*v)).collect();
    let mut frame = SeriesFrame::new(id(s), dates)
        .with_field("close", close.clone())
        .expect("aligned fixture");
    if with_adj {
        let adj = close.iter().map(|c| c.map(|v| v / 2.0)).collect();
        frame = frame.with_field("adjclose", adj).expect("aligned fixture");
    }
    frame
}

/// Canonical `A=[(2024-01,1.0),(2024-03,3.0)]`, `B=[(2024-02,2.0)]` fixture.
pub fn frame_a() -> SeriesFrame {
    value_frame(A, &[(d(2024, 1, 1), Some(1.0)), (d(2024, 3, 1), Some(3.0))])
}

pub fn frame_b() -> SeriesFrame {
    value_frame(B, &[(d(2024, 2, 1), Some(2.0))])
}

/// Dynamic mock plus its controller.
pub fn dynamic(name: &'static str) -> (Arc<dyn TavolaConnector>, DynamicMockController) {
    DynamicMockConnector::new_with_controller(name)
}

/// Register `Return` behaviors for several frames at once.
pub async fn returns(ctrl: &DynamicMockController, frames: Vec<SeriesFrame>) {
    for f in frames {
        ctrl.set_behavior(f.series().clone(), MockBehavior::Return(f))
            .await;
    }
}

/// Orchestrator over `connector` with a short provider timeout.
pub fn tavola(connector: Arc<dyn TavolaConnector>) -> Tavola {
    Tavola::builder()
        .with_connector(connector)
        .provider_timeout(Duration::from_millis(200))
        .build()
        .expect("tavola")
}

/// Whole year 2024.
pub const fn year_2024() -> (NaiveDate, NaiveDate) {
    match (
        NaiveDate::from_ymd_opt(2024, 1, 1),
        NaiveDate::from_ymd_opt(2024, 12, 31),
    ) {
        (Some(s), Some(e)) => (s, e),
        _ => panic!("valid dates"),
    }
}
