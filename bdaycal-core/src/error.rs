//! Error types for birthday calendar synchronization.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a synchronization run.
#[derive(Error, Debug)]
pub enum BirthdayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Could not parse birthday '{value}' of contact '{uid}'")]
    InvalidBirthday { uid: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BirthdayError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BirthdayError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for birthday operations.
pub type BirthdayResult<T> = Result<T, BirthdayError>;
