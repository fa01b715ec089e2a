use std::collections::HashSet;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tavola_core::{
    AssemblyOptions, FetchReport, NormalizationMode, RawSeries, SeriesId, SeriesSpec,
    TableRequest, TavolaError, frame_to_series,
};

use crate::Tavola;
use crate::core::{tag_err, with_request_deadline};
use crate::router::util::{SeriesResult, collapse_results};

/// Builder for one aligned-table request.
pub struct TableBuilder<'a> {
    pub(crate) tavola: &'a Tavola,
    pub(crate) series: Vec<SeriesSpec>,
    pub(crate) period: Option<(NaiveDate, NaiveDate)>,
    pub(crate) normalization: Option<NormalizationMode>,
    pub(crate) with_changes: bool,
    pub(crate) value_fields: Option<Vec<String>>,
}

impl<'a> TableBuilder<'a> {
    /// Create a new builder bound to a `Tavola` instance.
    ///
    /// Behavior:
    /// - Starts with an empty series list and no period.
    /// - Normalization defaults to the connector's preferred mode.
    /// - Validation of the full request is deferred until `run()`.
    #[must_use]
    pub const fn new(tavola: &'a Tavola) -> Self {
        Self {
            tavola,
            series: Vec::new(),
            period: None,
            normalization: None,
            with_changes: false,
            value_fields: None,
        }
    }

    /// Replace the series list.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if an identifier is empty or repeated.
    pub fn series(mut self, ids: &[&str]) -> Result<Self, TavolaError> {
        let mut seen = HashSet::new();
        let mut specs = Vec::with_capacity(ids.len());
        for raw in ids {
            let id = SeriesId::new(*raw)?;
            if !seen.insert(id.clone()) {
                return Err(TavolaError::invalid_config(format!(
                    "duplicate series '{id}' in series list"
                )));
            }
            specs.push(SeriesSpec::new(id));
        }
        self.series = specs;
        Ok(self)
    }

    /// Append a single series.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the identifier is empty or already listed.
    pub fn add_series(self, id: &str) -> Result<Self, TavolaError> {
        let id = SeriesId::new(id)?;
        self.push_spec(SeriesSpec::new(id))
    }

    /// Append a series whose columns are named `label` instead of the identifier.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the identifier is empty or already listed, or
    /// the label is empty.
    pub fn add_labeled(self, id: &str, label: &str) -> Result<Self, TavolaError> {
        if label.is_empty() {
            return Err(TavolaError::invalid_config(format!(
                "empty label for series '{id}'"
            )));
        }
        let id = SeriesId::new(id)?;
        self.push_spec(SeriesSpec::labeled(id, label))
    }

    /// Attach a display label to an already-listed series.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `id` is not in the list or the label is empty.
    pub fn label(mut self, id: &str, label: &str) -> Result<Self, TavolaError> {
        if label.is_empty() {
            return Err(TavolaError::invalid_config(format!(
                "empty label for series '{id}'"
            )));
        }
        let spec = self
            .series
            .iter_mut()
            .find(|s| s.id.as_str() == id)
            .ok_or_else(|| TavolaError::invalid_config(format!("series '{id}' is not listed")))?;
        spec.label = Some(label.to_string());
        Ok(self)
    }

    /// Set the inclusive date range `[start, end]`.
    #[must_use]
    pub const fn period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period = Some((start, end));
        self
    }

    /// Override the connector's calendar normalization.
    #[must_use]
    pub const fn normalization(mut self, mode: NormalizationMode) -> Self {
        self.normalization = Some(mode);
        self
    }

    /// Emit a `<name>-change` percent-change column after each value column.
    #[must_use]
    pub const fn with_changes(mut self, yes: bool) -> Self {
        self.with_changes = yes;
        self
    }

    /// Override the connector's candidate value fields, in priority order.
    #[must_use]
    pub fn value_fields(mut self, fields: &[&str]) -> Self {
        self.value_fields = Some(fields.iter().map(ToString::to_string).collect());
        self
    }

    /// The request this builder describes.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if no period was set.
    pub fn request(&self) -> Result<TableRequest, TavolaError> {
        let (start, end) = self
            .period
            .ok_or_else(|| TavolaError::invalid_config("no period specified"))?;
        Ok(TableRequest {
            series: self.series.clone(),
            start,
            end,
            normalization: self.normalization,
            with_changes: self.with_changes,
            value_fields: self.value_fields.clone(),
        })
    }

    /// Fetch every series and assemble the aligned table.
    ///
    /// # Errors
    /// See [`Tavola::fetch_table`].
    pub async fn run(self) -> Result<FetchReport, TavolaError> {
        let req = self.request()?;
        self.tavola.fetch_table(&req).await
    }

    fn push_spec(mut self, spec: SeriesSpec) -> Result<Self, TavolaError> {
        if self.series.iter().any(|s| s.id == spec.id) {
            return Err(TavolaError::invalid_config(format!(
                "duplicate series '{}' already exists in series list",
                spec.id
            )));
        }
        self.series.push(spec);
        Ok(self)
    }
}

impl Tavola {
    /// Begin building a table request.
    ///
    /// Typical usage: chain `series`/`period`/`with_changes` then call `run()`.
    #[must_use]
    pub const fn table(&'_ self) -> TableBuilder<'_> {
        TableBuilder::new(self)
    }

    /// Fetch every series of `req` and assemble the aligned table.
    ///
    /// Behavior:
    /// - Validates the request before any provider call.
    /// - Fetches series concurrently, at most `parallelism` at a time; each call
    ///   is bounded by the provider timeout and retried per the retry policy.
    /// - A series that fails is dropped and reported in `warnings`; a series
    ///   with no observations is listed in `empty_series`.
    /// - Columns follow the request order regardless of completion order.
    ///
    /// # Errors
    /// - `InvalidConfig` for a malformed request.
    /// - `Authentication` as soon as any series reports a rejected credential.
    /// - `AllSeriesFailed` when every series failed.
    /// - `RequestTimeout` when the request deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tavola::table::fetch_table",
            skip(self, req),
            fields(
                connector = self.connector.name(),
                series = req.series.len(),
                start = %req.start,
                end = %req.end,
            ),
        )
    )]
    pub async fn fetch_table(&self, req: &TableRequest) -> Result<FetchReport, TavolaError> {
        req.validate()?;
        let provider = self.connector.as_series_provider().ok_or_else(|| {
            TavolaError::invalid_config(format!(
                "connector '{}' does not serve series",
                self.connector.name()
            ))
        })?;
        let connector_name = self.connector.name();
        let mode = req
            .normalization
            .unwrap_or_else(|| self.connector.default_normalization());
        let fields: Vec<String> = req.value_fields.clone().unwrap_or_else(|| {
            provider
                .value_fields()
                .iter()
                .map(ToString::to_string)
                .collect()
        });
        let fields = fields.as_slice();
        let (start, end) = (req.start, req.end);

        let tasks = req.series.iter().enumerate().map(|(idx, spec)| {
            let id = spec.id.clone();
            async move {
                let result = self
                    .fetch_frame(provider, &id, start, end)
                    .await
                    .and_then(|frame| frame_to_series(&frame, fields))
                    .map(|raw| RawSeries::new(id.clone(), raw.observations))
                    .map_err(|e| tag_err(connector_name, &id, e));
                (idx, id, result)
            }
        });

        // Completion order; restored to request order once everything is in.
        let fan_out = async {
            let mut results: Vec<(usize, SeriesResult)> = Vec::with_capacity(req.series.len());
            let mut in_flight = stream::iter(tasks).buffer_unordered(self.cfg.parallelism);
            while let Some((idx, id, result)) = in_flight.next().await {
                if let Err(e @ TavolaError::Authentication { .. }) = &result {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(series = %id, error = %e, "credential rejected; aborting request");
                    return Err(e.clone());
                }
                if let Err(e) = &result {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(series = %id, error = %e, "dropping series");
                    #[cfg(not(feature = "tracing"))]
                    let _ = e;
                }
                results.push((idx, (id, result)));
            }
            Ok(results)
        };
        let mut results = with_request_deadline(self.cfg.request_timeout, fan_out).await??;
        results.sort_by_key(|(idx, _)| *idx);
        let results: Vec<SeriesResult> = results.into_iter().map(|(_, r)| r).collect();

        let opts = AssemblyOptions {
            mode,
            with_changes: req.with_changes,
        };
        let report = collapse_results(&req.series, results, opts)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows = report.table().map_or(0, tavola_core::FinalTable::row_count),
            dropped = report.warnings.len(),
            empty = report.empty_series.len(),
            "table request complete"
        );
        Ok(report)
    }
}
