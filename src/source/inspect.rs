//! Structural validation of a CSV file

use crate::error::{Error, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use std::path::Path;

/// Header and size of a CSV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvSummary {
    /// Column names from the header row, in file order
    pub headers: Vec<String>,
    /// Number of data rows (header excluded)
    pub row_count: usize,
}

/// Read a CSV file end to end, checking it is well formed
///
/// The file must have a header row and every record must have as many
/// fields as the header. Any violation is a parse error for the whole run.
pub fn inspect_csv(path: impl AsRef<Path>) -> Result<CsvSummary> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| Error::csv_parse(path, format!("Failed to open file: {e}")))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::csv_parse(path, format!("Failed to read header row: {e}")))?
        .iter()
        .map(String::from)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(Error::csv_parse(path, "No columns to parse from file"));
    }

    let mut row_count = 0usize;
    for record in reader.records() {
        record.map_err(|e| Error::csv_parse(path, e.to_string()))?;
        row_count += 1;
    }

    Ok(CsvSummary { headers, row_count })
}
