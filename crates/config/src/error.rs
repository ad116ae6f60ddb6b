//! Error types for the configuration engine

use marquee_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during configuration operations
///
/// Malformed values never surface here: they fall back to defaults inside
/// the value mappers. What remains is I/O, catalog and snapshot trouble.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a level file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a level file
    #[error("Failed to write config file at {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse a TOML document (catalog or snapshot)
    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to serialize a snapshot
    #[error("Failed to serialize snapshot: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Failed to export parameters as JSON
    #[error("Failed to export parameters: {0}")]
    ExportError(#[from] serde_json::Error),

    /// The parameter catalog is inconsistent
    #[error("Invalid parameter catalog: {reason}")]
    CatalogError { reason: String },

    /// No parameter with this name is registered
    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    /// A value that cannot be stored in a level file
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    /// Failed to create a configuration directory
    #[error("Failed to create config directory at {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A path could not be determined
    #[error("Could not determine path: {reason}")]
    PathResolutionError { reason: String },

    /// The configuration does not allow launching this game
    #[error("Launch rejected: {reason}")]
    LaunchRejected { reason: String },

    /// Restore was requested without a prior backup
    #[error("No configuration backup has been taken")]
    NoBackup,

    /// Generic I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ReadError { path, .. } | ConfigError::ParseError { path, .. } => {
                AppError::ConfigurationCorrupted { path }
            }
            ConfigError::WriteError { source, .. }
            | ConfigError::DirectoryCreationError { source, .. }
            | ConfigError::IoError(source) => AppError::IoError {
                message: source.to_string(),
                source,
            },
            ConfigError::LaunchRejected { reason } => AppError::InvalidLaunch { reason },
            ConfigError::InvalidValue {
                name,
                value,
                reason,
            } => AppError::InvalidValue {
                setting: name,
                value,
                reason,
            },
            ConfigError::UnknownParameter { name } => AppError::InvalidArgument {
                argument: name,
                reason: "no such parameter".to_string(),
            },
            other => AppError::InternalError {
                message: other.to_string(),
            },
        }
    }
}

/// Validation error for a specific parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Parameter name, optionally qualified with its level
    pub field: String,

    /// Human-readable error message
    pub message: String,

    /// The invalid value, if available
    pub value: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Creates a validation error with the invalid value
    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: Some(value.to_string()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field '{}': {}", self.field, self.message)?;
        if let Some(ref value) = self.value {
            write!(f, " (got: {})", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
