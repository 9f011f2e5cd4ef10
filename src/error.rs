//! Error types for the peak report pipeline.
//!
//! Only conditions that stop a whole run are represented here. Malformed rows
//! are not errors at all (see [`crate::row_parser::RowOutcome`]), and
//! per-file / per-directory I/O failures are logged and swallowed by the
//! pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that can end a peak report run.
#[derive(Debug, Error)]
pub enum PeakError {
    /// A window boundary did not match `MM/DD/YYYY HH:MM:SS`.
    ///
    /// Only raised when strict timestamp checking is enabled; otherwise an
    /// invalid window is a silent no-op.
    #[error("invalid timestamp {value:?}, expected MM/DD/YYYY HH:MM:SS")]
    InvalidTimestamp { value: String },

    /// A file or directory could not be read.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The TOML configuration file could not be parsed.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The merged report could not be rendered as JSON.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PeakError {
    /// Wraps an [`io::Error`] with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PeakError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PeakError>;
