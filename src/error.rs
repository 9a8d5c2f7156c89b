//! Errors raised around the engine: reading jobs, parsing payloads and loading configuration.
//!
//! Alignment itself never fails; these only arise at the edges where files and JSON enter.

use std::path::PathBuf;

/// Result alias for fallible sourcemark operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
/// Failure reading or decoding input to the engine.
pub enum Error {
    /// A file could not be read.
    #[error("failed to read {path}: {source}", path = path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Standard input could not be read.
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),
    /// JSON input did not have the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration file was readable but not valid.
    #[error("invalid configuration in {path}: {message}", path = path.display())]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}
