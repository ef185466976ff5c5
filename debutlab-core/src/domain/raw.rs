//! Raw table: the source-specific table handed to the normalizer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when raw data cannot form a table at all.
#[derive(Debug, Error, PartialEq)]
pub enum RawTableError {
    #[error("raw table has no header row")]
    NoHeader,

    #[error("row {row} has {found} cells, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A header row plus rows of optional cells, exactly as the source supplied them.
///
/// Empty cells are `None`. Column names are not yet mapped to canonical fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a raw table, rejecting a missing header or rows whose width
    /// differs from the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self, RawTableError> {
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(RawTableError::NoHeader);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(RawTableError::RaggedRow {
                    row: i,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Convenience constructor from string literals; blank cells become `None`.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Result<Self, RawTableError> {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell_value(cell)).collect())
            .collect();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Turn a raw cell into an optional value: whitespace-only cells are absent.
pub fn cell_value(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
