//! TOML configuration: data source, normalizer, display, export.
//!
//! Every section is optional; an empty file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use debutlab_core::{Criteria, DisplayOptions, NormalizerConfig};

use crate::data_loader::{FileSource, RawSource, UrlSource};
use crate::export::ExportOptions;

/// Errors from loading configuration or criteria files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid [source] section: {0}")]
    InvalidSource(String),
}

/// Where the raw data comes from. Exactly one of `path` or `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

impl SourceConfig {
    pub fn into_source(self) -> Result<Box<dyn RawSource>, ConfigError> {
        match (self.path, self.url) {
            (Some(path), None) => Ok(Box::new(FileSource::new(path))),
            (None, Some(url)) => Ok(Box::new(UrlSource::new(url))),
            (Some(_), Some(_)) => Err(ConfigError::InvalidSource(
                "set either `path` or `url`, not both".into(),
            )),
            (None, None) => Err(ConfigError::InvalidSource(
                "one of `path` or `url` is required".into(),
            )),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: Option<SourceConfig>,
    pub normalizer: NormalizerConfig,
    pub display: DisplayOptions,
    pub export: ExportOptions,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&read(path)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load a criteria set from a TOML file.
pub fn load_criteria(path: &Path) -> Result<Criteria, ConfigError> {
    Ok(toml::from_str(&read(path)?)?)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
