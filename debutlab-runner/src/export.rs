//! Export: the presentation table as a downloadable CSV file.
//!
//! Cells are written from each row's numeric record, not from its display
//! strings, so the file stays machine-usable: money as plain numbers, value
//! change as a signed number without `%`, dates as `YYYY-MM-DD`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use debutlab_core::{Column, FieldKind, PresentationRow, PresentationTable};

/// File name of the exported artifact.
pub const EXPORT_FILE_NAME: &str = "filtered_debutants.csv";

/// Content type of the exported artifact.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Errors from the export layer. The displayed table is unaffected by them.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no results to export (run the filters first)")]
    NothingToExport,

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Export options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Column headers to leave out of the file.
    pub exclude: BTreeSet<String>,
}

/// A serialized table ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact under `dir` with its fixed file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.file_name);
        std::fs::create_dir_all(dir)
            .and_then(|_| std::fs::write(&path, &self.bytes))
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

/// Serialize a presentation table to CSV. An empty table yields a header-only file.
pub fn export_csv(table: &PresentationTable, options: &ExportOptions) -> Result<ExportArtifact, ExportError> {
    let columns: Vec<&Column> = table
        .columns
        .iter()
        .filter(|c| !options.exclude.contains(c.header()))
        .collect();

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(columns.iter().map(|c| c.header()))?;

    for row in &table.rows {
        wtr.write_record(columns.iter().map(|c| raw_cell(row, c)))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;

    Ok(ExportArtifact {
        file_name: EXPORT_FILE_NAME,
        content_type: EXPORT_CONTENT_TYPE,
        bytes,
    })
}

fn raw_cell(row: &PresentationRow, column: &Column) -> String {
    let record = &row.record;
    match column {
        Column::Extra(name) => record.extra.get(name).cloned().unwrap_or_default(),
        Column::Field(field) => match field.kind() {
            FieldKind::Text => record.text(*field).unwrap_or_default().to_string(),
            FieldKind::Date => record
                .debut_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            FieldKind::Integer => record
                .integer(*field)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            FieldKind::Money => record.number(*field).map(plain_amount).unwrap_or_default(),
            FieldKind::Percent => record.number(*field).map(plain_percent).unwrap_or_default(),
        },
    }
}

fn plain_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// One decimal, no sign on values that round to zero.
fn plain_percent(value: f64) -> String {
    let text = format!("{value:.1}");
    if text == "-0.0" {
        "0.0".to_string()
    } else {
        text
    }
}
