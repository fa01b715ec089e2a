use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tavola_types::{Change, ColumnData, FinalTable, TavolaError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rendering options for CSV export.
///
/// With the default (empty) marker an undefined change and an absent one
/// render the same; set `undefined_marker` (e.g. `"NaN"`) to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Text written for `Change::Undefined` cells. Absent cells are always empty.
    pub undefined_marker: String,
}

impl CsvOptions {
    /// Options writing `marker` for undefined changes.
    #[must_use]
    pub fn with_undefined_marker(marker: impl Into<String>) -> Self {
        Self {
            undefined_marker: marker.into(),
        }
    }
}

/// CSV serialization of a final table.
///
/// Layout: a header row `date,<col>,...` followed by one row per date, dates in
/// `YYYY-MM-DD`. Output is a pure function of the table and options.
pub trait CsvExport {
    /// Write the table to any writer.
    ///
    /// # Errors
    /// Returns `Export` if the writer fails.
    fn write_csv<W: io::Write>(&self, writer: W, opts: &CsvOptions) -> Result<(), TavolaError>;

    /// Render the table to a string.
    ///
    /// # Errors
    /// Returns `Export` if rendering fails.
    fn to_csv_string(&self, opts: &CsvOptions) -> Result<String, TavolaError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf, opts)?;
        String::from_utf8(buf).map_err(|e| TavolaError::Export(e.to_string()))
    }

    /// Write the table to `path`, appending `.csv` when the name lacks that extension.
    ///
    /// Returns the path actually written.
    ///
    /// # Errors
    /// Returns `Export` if the file cannot be created or written.
    fn write_csv_path(
        &self,
        path: impl AsRef<Path>,
        opts: &CsvOptions,
    ) -> Result<PathBuf, TavolaError> {
        let path = with_csv_extension(path.as_ref());
        let file = File::create(&path)
            .map_err(|e| TavolaError::Export(format!("{}: {e}", path.display())))?;
        self.write_csv(BufWriter::new(file), opts)?;
        Ok(path)
    }
}

fn with_csv_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "csv") {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".csv");
    PathBuf::from(name)
}

fn render_value(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn render_change(c: Change, opts: &CsvOptions) -> String {
    match c {
        Change::Absent => String::new(),
        Change::Undefined => opts.undefined_marker.clone(),
        Change::Value(v) => v.to_string(),
    }
}

fn export_err(e: impl std::fmt::Display) -> TavolaError {
    TavolaError::Export(e.to_string())
}

impl CsvExport for FinalTable {
    fn write_csv<W: io::Write>(&self, writer: W, opts: &CsvOptions) -> Result<(), TavolaError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.header()).map_err(export_err)?;

        for (row, date) in self.dates().iter().enumerate() {
            let mut record = Vec::with_capacity(self.columns().len() + 1);
            record.push(date.format(DATE_FORMAT).to_string());
            for col in self.columns() {
                record.push(match &col.data {
                    ColumnData::Values(v) => render_value(v[row]),
                    ColumnData::Changes(c) => render_change(c[row], opts),
                });
            }
            wtr.write_record(&record).map_err(export_err)?;
        }
        wtr.flush().map_err(export_err)
    }
}
