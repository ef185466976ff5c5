//! Annotation engine: per-row highlight classification.
//!
//! Classification is computed from the numeric baseline/current values, never
//! from their display strings. How a highlight is rendered is up to the consumer.

use serde::{Deserialize, Serialize};

use crate::domain::Record;
use crate::schema::Field;

/// Highlight verdict for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Increased,
    Decreased,
    Neutral,
}

impl Highlight {
    pub fn classify(baseline: Option<f64>, current: Option<f64>) -> Self {
        match (baseline, current) {
            (Some(b), Some(c)) if c > b => Highlight::Increased,
            (Some(b), Some(c)) if c < b => Highlight::Decreased,
            _ => Highlight::Neutral,
        }
    }

    pub fn of(record: &Record) -> Self {
        Self::classify(record.value_at_debut, record.current_value)
    }
}

/// Highlights for a table, keyed by row position, plus the cell they apply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// The designated cell in each row.
    pub field: Field,
    pub rows: Vec<Highlight>,
}

impl Annotation {
    pub fn get(&self, row: usize) -> Option<Highlight> {
        self.rows.get(row).copied()
    }

    pub fn count(&self, highlight: Highlight) -> usize {
        self.rows.iter().filter(|h| **h == highlight).count()
    }
}

/// Classify every record; the designated cell is the current value.
pub fn annotate(records: &[Record]) -> Annotation {
    Annotation {
        field: Field::CurrentValue,
        rows: records.iter().map(Highlight::of).collect(),
    }
}
