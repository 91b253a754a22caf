//! Typed errors for the store and the extractors.
//!
//! Orchestration code wraps these in `anyhow` with context; the store and
//! extractor surfaces keep them typed so tests can match on the variant.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the per-source record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing document failed.
    #[error("store io at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document exists but is not a valid store document.
    #[error("store document is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// `add` was called for a day that already has a record.
    #[error("record {0} already exists")]
    DuplicateKey(String),

    /// `update` was called for a day that has no record.
    #[error("record {0} not found")]
    NotFound(String),
}

/// Failures turning raw source content into a snapshot.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The expected counters are not present in the content at all.
    #[error("no counters found: {0}")]
    MissingField(&'static str),

    /// JSON payload could not be parsed.
    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),
}
