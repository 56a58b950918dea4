use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, StatsError};

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Number(v),
            // "NaN" / "inf" exports carry no usable value.
            Ok(_) => CellValue::Missing,
            Err(_) => CellValue::Text(s.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Key form used for player identity. `Display` already prints integral
    /// floats without the `.0`, at any magnitude.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Missing => None,
        }
    }
}

/// One uploaded match export: one row per player observation. Every row is
/// exactly as wide as `headers`.
#[derive(Debug, Clone)]
pub struct RawMatchTable {
    pub source_name: String,
    pub headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawMatchTable {
    pub fn new(source_name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            source_name: source_name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Missing);
        self.rows.push(row);
    }

    pub fn from_reader<R: Read>(source_name: &str, reader: R) -> Result<Self> {
        let csv_err = |source: csv::Error| StatsError::Csv {
            source_name: source_name.to_string(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let mut table = RawMatchTable::new(source_name, headers);
        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            table.push_row(record.iter().map(CellValue::parse).collect());
        }
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| StatsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_reader(&name, file)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
