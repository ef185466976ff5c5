//! Presentation table: derived records with their display strings and highlights.
//!
//! Each row carries the numeric [`Record`] next to its formatted cells, so no
//! consumer has to re-correlate display rows with numeric values by position.

use serde::{Deserialize, Serialize};

use crate::annotate::{Annotation, Highlight};
use crate::domain::Record;
use crate::format::{format_cell, DisplayOptions};
use crate::schema::{Field, Schema};

/// A presentation column: a canonical field or a pass-through source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Field(Field),
    Extra(String),
}

impl Column {
    pub fn header(&self) -> &str {
        match self {
            Column::Field(field) => field.header(),
            Column::Extra(name) => name,
        }
    }

    /// Column list for a table: display fields present in the schema, then
    /// pass-through columns in source order.
    pub fn for_schema(schema: &Schema, extra_columns: &[String]) -> Vec<Column> {
        schema
            .display_fields()
            .into_iter()
            .map(Column::Field)
            .chain(extra_columns.iter().cloned().map(Column::Extra))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationRow {
    pub record: Record,
    /// One display string per column.
    pub cells: Vec<String>,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationTable {
    pub columns: Vec<Column>,
    pub rows: Vec<PresentationRow>,
}

impl PresentationTable {
    /// Assemble rows from derived records and their annotation.
    pub fn build(
        columns: Vec<Column>,
        records: Vec<Record>,
        annotation: &Annotation,
        options: &DisplayOptions,
    ) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                let cells = columns
                    .iter()
                    .map(|column| match column {
                        Column::Field(field) => format_cell(&record, *field, options),
                        Column::Extra(name) => record.extra.get(name).cloned().unwrap_or_default(),
                    })
                    .collect();
                PresentationRow {
                    highlight: annotation.get(i).unwrap_or(Highlight::Neutral),
                    record,
                    cells,
                }
            })
            .collect();
        Self { columns, rows }
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(Column::header).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-row highlights keyed by row position.
    pub fn annotation(&self) -> Annotation {
        Annotation {
            field: Field::CurrentValue,
            rows: self.rows.iter().map(|r| r.highlight).collect(),
        }
    }

    /// Position of a column by header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.header() == header)
    }
}
