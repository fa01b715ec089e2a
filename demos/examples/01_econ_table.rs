use chrono::NaiveDate;
use tavola::{CsvExport, CsvOptions, Tavola};
use tavola_demos::common::{end_date, indicator_connector, output_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    // 1. Monthly indicators, aligned to the first of the month.
    let tavola = Tavola::builder()
        .with_connector(indicator_connector())
        .parallelism(2)
        .build()?;

    let start = NaiveDate::from_ymd_opt(2020, 1, 1).ok_or("bad start date")?;
    let report = tavola
        .table()
        .series(tavola_fred::DEFAULT_SERIES)?
        .period(start, end_date())
        .run()
        .await?;

    for w in &report.warnings {
        println!("warning: {w}");
    }
    let Some(table) = report.table() else {
        println!("No data found for the selected series and period.");
        return Ok(());
    };

    // 2. Preview, then write the CSV.
    let csv = table.to_csv_string(&CsvOptions::default())?;
    for line in csv.lines().take(6) {
        println!("{line}");
    }
    let path = table.write_csv_path(output_path("econ_data.csv"), &CsvOptions::default())?;
    println!("Wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}
