//! Error types for the coilscan library.
//!
//! The extraction engine itself never fails: garbled or empty input degrades
//! to empty fields and defect text. [`CoilScanError`] only covers the edges
//! that touch the outside world:
//!
//! * **Configuration**: reading or parsing a config file. These errors are
//!   normally swallowed by [`crate::config::ExtractionConfig::from_source`],
//!   which substitutes defaults, but they are surfaced to callers that load
//!   a [`crate::config::ConfigSource`] directly.
//! * **Input**: reading fragment files or decoding the recognition
//!   collaborator's JSON.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the coilscan library.
#[derive(Debug, Error)]
pub enum CoilScanError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Config file was not found at the given path.
    #[error("Config file not found: '{path}'")]
    ConfigNotFound { path: PathBuf },

    /// Config file exists but could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON.
    #[error("Config file '{path}' is not valid JSON: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file could not be read.
    #[error("Failed to read input '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input looked like a JSON fragment list but did not decode.
    #[error("Invalid OCR fragment list: {detail}\nExpected [{{\"text\": \"...\", \"box\": [[x,y],[x,y],[x,y],[x,y]]}}, ...]")]
    InvalidFragments { detail: String },
}
