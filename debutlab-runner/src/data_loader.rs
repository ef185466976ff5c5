//! Raw data acquisition and canonical table loading.
//!
//! A [`RawSource`] supplies the raw bytes (local file, HTTP, or memory). The
//! bytes are parsed as CSV into a [`RawTable`] and normalized once. Any
//! failure before the canonical table exists is a [`LoadError`]; no partial
//! table is ever returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use debutlab_core::domain::raw::cell_value;
use debutlab_core::{CanonicalTable, Normalizer, RawTable, RawTableError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("raw data from '{0}' is empty")]
    Empty(String),

    #[error("raw data is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("raw data is not a table: {0}")]
    Table(#[from] RawTableError),
}

/// Upstream collaborator that supplies the raw tabular blob.
pub trait RawSource: Send + Sync {
    /// Human-readable origin, e.g. a path or URL.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Vec<u8>, LoadError>;
}

/// Raw data from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        std::fs::read(&self.path).map_err(|source| LoadError::Read {
            path: self.path.clone(),
            source,
        })
    }
}

/// Raw data from an HTTP(S) URL (blocking GET).
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
}

impl UrlSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RawSource for UrlSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let fail = |e: reqwest::Error| LoadError::Fetch {
            url: self.url.clone(),
            reason: e.to_string(),
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(fail)?;
        let response = client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fail)?;
        let bytes = response.bytes().map_err(fail)?;
        Ok(bytes.to_vec())
    }
}

/// Raw data already in memory. Used by tests and embedding callers.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl RawSource for MemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Ok(self.bytes.clone())
    }
}

/// Canonical table plus provenance, built once per load.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Arc<CanonicalTable>,
    /// BLAKE3 hash of the raw bytes.
    pub dataset_hash: String,
    pub source: String,
}

/// Parse CSV bytes into a raw table. The first row is the header.
pub fn parse_raw_table(bytes: &[u8], origin: &str) -> Result<RawTable, LoadError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::Empty(origin.to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(cell_value).collect());
    }

    Ok(RawTable::new(headers, rows)?)
}

/// Fetch, parse, and normalize.
pub fn load_table(source: &dyn RawSource, normalizer: &Normalizer) -> Result<LoadedTable, LoadError> {
    let origin = source.describe();
    let bytes = source.fetch()?;
    debug!(source = %origin, bytes = bytes.len(), "fetched raw data");

    let raw = parse_raw_table(&bytes, &origin)?;
    let table = normalizer.normalize(&raw);
    let dataset_hash = blake3::hash(&bytes).to_hex().to_string();

    info!(
        source = %origin,
        rows = table.len(),
        dataset_hash = %&dataset_hash[..12],
        "loaded canonical table"
    );

    Ok(LoadedTable {
        table: Arc::new(table),
        dataset_hash,
        source: origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let raw = parse_raw_table(b"comp_name,country\nSerie A,Italy\n,Spain\n", "test").unwrap();
        assert_eq!(raw.headers(), ["comp_name", "country"]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.rows()[1][0], None);
    }

    #[test]
    fn strips_byte_order_mark() {
        let raw = parse_raw_table(b"\xEF\xBB\xBFplayer_name\nSilva\n", "test").unwrap();
        assert_eq!(raw.headers(), ["player_name"]);
    }

    #[test]
    fn header_only_input_is_an_empty_table() {
        let raw = parse_raw_table(b"player_name,goals\n", "test").unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn empty_input_is_a_load_error() {
        let err = parse_raw_table(b"  \n", "test").unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }

    #[test]
    fn ragged_rows_are_a_load_error() {
        let err = parse_raw_table(b"a,b\n1,2\n3\n", "test").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn invalid_utf8_is_a_load_error() {
        let err = parse_raw_table(b"a,b\n\xFF\xFE,1\n", "test").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let source = FileSource::new("/definitely/not/here.csv");
        let err = load_table(&source, &Normalizer::default()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn dataset_hash_is_deterministic() {
        let source = MemorySource::new("mem", "player_name\nSilva\n");
        let a = load_table(&source, &Normalizer::default()).unwrap();
        let b = load_table(&source, &Normalizer::default()).unwrap();
        assert_eq!(a.dataset_hash, b.dataset_hash);
        assert_eq!(a.dataset_hash.len(), 64);
        assert_eq!(a.source, "mem");
        assert_eq!(a.table.len(), 1);
    }
}
