use std::time::Duration;

use chrono::NaiveDate;
use tavola::Tavola;
use tavola_demos::common::{end_date, indicator_connector};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,tavola=trace,tavola_fred=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let tavola = Tavola::builder()
        .with_connector(indicator_connector())
        .provider_timeout(Duration::from_secs(15))
        .build()?;

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("bad start date")?;
    let report = tavola
        .table()
        .series(&["UNRATE", "FEDFUNDS"])?
        .period(start, end_date())
        .run()
        .await?;

    tracing::info!(
        rows = report.table().map_or(0, tavola::FinalTable::row_count),
        dropped = ?report.dropped_series(),
        "done"
    );
    Ok(())
}
