//! Unified error types for Ember.
//!
//! The progression engine treats every failure as fatal for the call in
//! which it occurs: a failed load or save aborts the whole operation and
//! nothing partial is persisted. Callers surface the error to the user.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Ember operations.
#[derive(Error, Debug)]
pub enum EmberError {
    /// I/O errors from profile file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Habit lookup failures (unknown name or id).
    #[error("unknown habit: {name}")]
    UnknownHabit { name: String },

    /// Habit validation failures (empty name, name too long, duplicate).
    #[error("invalid habit: {message}")]
    InvalidHabit { message: String },
}

/// A specialized Result type for Ember operations.
pub type Result<T> = std::result::Result<T, EmberError>;

impl EmberError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown habit error.
    pub fn unknown_habit(name: impl Into<String>) -> Self {
        Self::UnknownHabit { name: name.into() }
    }

    /// Create an invalid habit error.
    pub fn invalid_habit(message: impl Into<String>) -> Self {
        Self::InvalidHabit {
            message: message.into(),
        }
    }
}

impl From<io::Error> for EmberError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EmberError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}
