//! Error types for scroll derivation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Container library error.
    #[error("{0}")]
    Esm(#[from] scribe_esm::Error),

    /// A plugin could not be read completely.
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: scribe_esm::Error,
    },

    /// An output module could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for derivation operations.
pub type Result<T> = std::result::Result<T, Error>;
