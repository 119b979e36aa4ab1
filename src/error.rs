//! Error types for the console session core

use thiserror::Error;

use crate::model::AssetId;

/// Errors surfaced by panel operations and their collaborators.
///
/// Panels treat every variant the same way: log it, raise an error
/// notification and keep the previously committed state.
#[derive(Error, Debug)]
pub enum Error {
    /// A backend source rejected an operation
    #[error("{source_name} failed during {operation}: {message}")]
    SourceError {
        source_name: &'static str,
        operation: &'static str,
        message: String,
    },

    #[error("Asset {0} not found")]
    AssetNotFound(AssetId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl Error {
    /// Shorthand for a failed backend call.
    pub fn backend(
        source_name: &'static str,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Error::SourceError {
            source_name,
            operation,
            message: message.into(),
        }
    }

    /// Short category used as a metric label
    pub fn kind(&self) -> &'static str {
        match self {
            Error::SourceError { .. } => "source",
            Error::AssetNotFound(_) => "not_found",
            Error::InvalidInput(_) => "invalid_input",
            Error::ConfigError(_) | Error::TomlError(_) => "config",
            Error::IoError(_) => "io",
            Error::SerializationError(_) => "serialization",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
