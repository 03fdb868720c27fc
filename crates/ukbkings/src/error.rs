//! Error types for the ukbkings library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for munging and linking operations.
///
/// Per-record problems (unknown declared types, name collisions) are not
/// errors; they are reported as [`Anomaly`](crate::Anomaly) values.
#[derive(Debug, Error)]
pub enum MungeError {
    /// The dictionary document is missing or cannot be read.
    #[error("Source not found '{path}': {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document lacks the expected table structure.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The output table could not be written.
    #[error("Write failure for '{path}': {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory or symbolic link could not be created.
    #[error("Link error for '{path}': {source}")]
    Link {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for ukbkings operations.
pub type Result<T> = std::result::Result<T, MungeError>;
