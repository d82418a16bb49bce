//! Error types for each stage of an aggregation run.
//!
//! Only [`PersistenceError`] is allowed to fail a run. Retrieval and
//! translation errors are absorbed by the stage that owns them, and
//! [`ConfigError`] can only happen at startup.

use std::path::PathBuf;
use thiserror::Error;

/// A single feed query could not be retrieved or parsed.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(u16),
    #[error("malformed feed: {0}")]
    Parse(#[from] quick_xml::DeError),
}

/// Language detection or translation failed.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service returned status {0}")]
    Status(u16),
    #[error("unexpected translation response: {0}")]
    Malformed(String),
}

/// The snapshot could not be cleared or written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The pipeline configuration is unreadable or invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("`{0}` must not be empty")]
    Empty(&'static str),
    #[error("duplicate entry in `{field}`: {value}")]
    Duplicate { field: &'static str, value: String },
    #[error("invalid feed endpoint: {0}")]
    Endpoint(String),
}
