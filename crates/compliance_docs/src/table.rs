use compliance_core::ExportError;

use crate::record::{Record, Value};

/// A record sequence normalized to the key set of its first record.
///
/// Every row has exactly one cell per header. Fields missing from a record
/// become [`Value::Null`]; fields the first record does not have are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Fails with [`ExportError::EmptyInput`] when there are no records or
    /// the first record has no fields.
    pub fn from_records(records: &[Record]) -> Result<Self, ExportError> {
        let first = records.first().ok_or(ExportError::EmptyInput)?;
        if first.is_empty() {
            return Err(ExportError::EmptyInput);
        }

        let headers: Vec<String> = first.keys().map(String::from).collect();
        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.get(h).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Every cell in its plain textual form.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Value::to_string).collect())
            .collect()
    }
}
