//! DebutLab Runner — data loading, configuration, sessions, and export.
//!
//! This crate builds on `debutlab-core` to provide:
//! - Raw data sources (file, HTTP, memory) and CSV parsing into a raw table
//! - One-shot normalization into a shared canonical table with a dataset hash
//! - TOML configuration for the source, normalizer, display, and export
//! - A session that holds criteria, runs the pipeline on trigger, and resets
//! - CSV export of the current presentation table

pub mod config;
pub mod data_loader;
pub mod export;
pub mod session;

pub use config::{load_criteria, AppConfig, ConfigError, SourceConfig};
pub use data_loader::{
    load_table, parse_raw_table, FileSource, LoadError, LoadedTable, MemorySource, RawSource,
    UrlSource,
};
pub use export::{
    export_csv, ExportArtifact, ExportError, ExportOptions, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME,
};
pub use session::{RunOutcome, RunRequest, Session};
