//! Error types for record container parsing and writing.

use thiserror::Error;

/// Errors that can occur when reading or writing plugin containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] scribe_common::Error),

    /// A record or sub-record header claims more bytes than remain.
    #[error("truncated input: needed {needed} bytes but only {available} available")]
    TruncatedInput { needed: usize, available: usize },

    /// A sub-record overruns the body of the record that contains it.
    #[error("sub-record {tag} declares {declared} bytes but only {remaining} remain in the record")]
    MalformedSubRecord {
        tag: String,
        declared: usize,
        remaining: usize,
    },

    /// A record did not have the expected type.
    #[error("unexpected record type: expected {expected}, got {actual}")]
    UnexpectedRecord { expected: String, actual: String },
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
