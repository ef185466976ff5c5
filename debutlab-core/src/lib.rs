//! DebutLab Core — debut records, normalizer, filters, derivation, annotation, formatting.
//!
//! This crate is the pure part of the explorer:
//! - Domain types (raw table, record, canonical table) and the field schema
//! - Normalizer: column mapping, calendar attributes, conditional rewrites, compound keys
//! - Filter engine with "no restriction" sentinels
//! - Derivation of value change and per-row highlight classification
//! - Display formatting and the presentation table
//!
//! Nothing here performs I/O; loading and export live in `debutlab-runner`.

pub mod annotate;
pub mod derive;
pub mod domain;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod options;
pub mod parse;
pub mod pipeline;
pub mod present;
pub mod schema;

pub use annotate::{annotate, Annotation, Highlight};
pub use derive::{derive, percent_change};
pub use domain::{CanonicalTable, RawTable, RawTableError, Record};
pub use filter::{apply_filters, filter_table, AgeRange, Criteria, RecordFilter, Selection, ALL_MARKER};
pub use format::DisplayOptions;
pub use normalize::{ColumnMapping, ConditionalRewrite, Normalizer, NormalizerConfig, UnmappedColumns};
pub use options::{CompetitionOption, CriteriaOptions};
pub use pipeline::run_pipeline;
pub use present::{Column, PresentationRow, PresentationTable};
pub use schema::{Field, FieldKind, Schema};
