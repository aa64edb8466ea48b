use std::io;

use thiserror::Error;

/// Result type used across the departures core crate.
pub type Result<T> = std::result::Result<T, DeparturesError>;

/// Canonical error representation shared by all departures crates.
#[derive(Debug, Error)]
pub enum DeparturesError {
    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("logging setup failed: {0}")]
    LoggingError(String),
}

/// Configuration problems. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {source}")]
    InvalidEnvVar {
        key: &'static str,
        #[source]
        source: std::env::VarError,
    },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    #[error("reference data contains no {0}")]
    EmptyReference(&'static str),

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            message: message.into(),
        }
    }

    pub fn from_io(path: impl AsRef<std::path::Path>, source: io::Error) -> Self {
        ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn parse_error(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }
}
