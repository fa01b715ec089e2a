use tavola_core::{
    AssemblyOptions, FetchOutcome, FetchReport, RawSeries, SeriesId, SeriesSpec, TavolaError,
    assemble_table,
};

/// Per-series fetch result in request order.
pub type SeriesResult = (SeriesId, Result<RawSeries, TavolaError>);

/// Classify per-series results and assemble the final table.
///
/// Rules:
/// - Any `Authentication` error → that error (the batch is aborted).
/// - At least one series with observations → `Table`, failures become warnings.
/// - Every series failed → `AllSeriesFailed(errors)`.
/// - Otherwise (all empty, or empty plus failed) → `Empty` with the warnings.
///
/// # Errors
/// See the rules above; also propagates table invariant violations from assembly.
pub fn collapse_results(
    requested: &[SeriesSpec],
    results: Vec<SeriesResult>,
    opts: AssemblyOptions,
) -> Result<FetchReport, TavolaError> {
    let mut raw: Vec<RawSeries> = Vec::with_capacity(results.len());
    let mut warnings: Vec<TavolaError> = Vec::new();
    let mut empty_series: Vec<SeriesId> = Vec::new();

    for (id, result) in results {
        match result {
            Ok(series) if series.is_empty() => empty_series.push(id),
            Ok(series) => raw.push(series),
            Err(e @ TavolaError::Authentication { .. }) => return Err(e),
            Err(e) => warnings.push(e),
        }
    }

    if raw.is_empty() && empty_series.is_empty() && !warnings.is_empty() {
        return Err(TavolaError::AllSeriesFailed(warnings));
    }

    let outcome = match assemble_table(requested, &raw, opts)? {
        Some(table) => FetchOutcome::Table(table),
        None => FetchOutcome::Empty,
    };
    Ok(FetchReport {
        outcome,
        warnings,
        empty_series,
    })
}
