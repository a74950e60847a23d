use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::ReportError;

/// A CSV file loaded into memory with normalized column names.
///
/// Header names are trimmed and lowercased so that `Type`, ` TYPE ` and
/// `type` all resolve to the same column. Cell values are left untouched.
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

impl CsvTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let rows = reader
            .records()
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

        debug!(
            "Loaded CSV with {} columns and {} data rows",
            headers.len(),
            rows.len()
        );

        Ok(Self { headers, rows })
    }

    pub fn from_bytes(content: &[u8]) -> Result<Self, ReportError> {
        Self::from_reader(content)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of the first column whose normalized name equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = normalize_header(name);
        self.headers.iter().position(|h| *h == name)
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
