use chrono::NaiveDate;
use tavola::{CsvExport, CsvOptions, Tavola};
use tavola_demos::common::{end_date, market_connector, output_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let tavola = Tavola::builder().with_connector(market_connector()).build()?;

    // Daily closes for the three major US indices, labelled and with changes.
    let mut builder = tavola.table();
    for sym in tavola_yahoo::DEFAULT_SYMBOLS {
        builder = match tavola_yahoo::index_label(sym) {
            Some(label) => builder.add_labeled(sym, label)?,
            None => builder.add_series(sym)?,
        };
    }
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad start date")?;
    let report = builder
        .period(start, end_date())
        .with_changes(true)
        .run()
        .await?;

    let Some(table) = report.table() else {
        println!("No market data in range.");
        return Ok(());
    };
    println!("{}", table.header().join(" | "));
    if let Some(last) = table.dates().last() {
        println!("last row: {last}");
    }
    let opts = CsvOptions {
        undefined_marker: "NaN".to_string(),
    };
    let path = table.write_csv_path(output_path("market_data.csv"), &opts)?;
    println!("Wrote {}", path.display());
    Ok(())
}
