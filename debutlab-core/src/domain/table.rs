//! Canonical table: the normalized record collection built once per load.

use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::schema::Schema;

/// Normalized records plus the schema describing which fields exist.
///
/// Built once per load and shared read-only by every downstream stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub schema: Schema,
    pub records: Vec<Record>,
    /// Raw headers of pass-through columns, in source order.
    pub extra_columns: Vec<String>,
}

impl CanonicalTable {
    pub fn new(schema: Schema, records: Vec<Record>, extra_columns: Vec<String>) -> Self {
        Self {
            schema,
            records,
            extra_columns,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
