//! Tabular Datasets

use crate::error::{CsvError, DatasetError, SchemaError};
use std::path::Path;
use tracing::{debug, info};

/// Raw tabular data: an ordered header list plus string cells.
///
/// Cells are not interpreted here; numeric parsing happens in the encoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table. Every row must have one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, SchemaError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(SchemaError::RaggedRow {
                row,
                expected: headers.len(),
                found: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Convenience constructor for literal data
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Result<Self, SchemaError> {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Iterate over one column's cells
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Cell lookup by row and column name
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    pub(crate) fn headers_mut(&mut self) -> &mut Vec<String> {
        &mut self.headers
    }

    /// Replace (or append) a column with computed values
    pub(crate) fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Check that every named column exists
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), SchemaError> {
        for column in columns {
            if self.column_index(column).is_none() {
                return Err(SchemaError::MissingColumn {
                    column: column.to_string(),
                    available: self.headers.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Read a headered CSV file into a [`Table`]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table, DatasetError> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: shown.clone(),
        message: e.to_string(),
    })?;
    let table = read_csv(file).map_err(|source| DatasetError::Csv {
        path: shown.clone(),
        source,
    })?;

    info!("Loaded {} rows from {}", table.len(), shown);
    Ok(table)
}

/// Parse CSV from any reader
pub fn read_csv<R: std::io::Read>(input: R) -> Result<Table, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::None)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::Headers(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CsvError::Record {
            row: line + 1,
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("Parsed CSV: {} columns, {} rows", headers.len(), rows.len());
    Ok(Table::new(headers, rows)?)
}
