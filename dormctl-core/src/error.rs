//! Structured error types for dormctl-core.
//!
//! Library crates return `DormError`; the `dormctl` binary wraps it in `anyhow`
//! with extra context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DormError {
    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// JSON parsing or serialization failed
    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Configuration could not be interpreted
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

pub type Result<T> = std::result::Result<T, DormError>;

impl DormError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
