//! Error types and recovery strategies for Marquee
//!
//! Errors are classified into three severity tiers:
//! - **Recoverable**: the front-end falls back to a default and carries on
//!   (malformed value, missing file, missing selector)
//! - **Degraded**: the in-progress transition is aborted, prior state stays
//!   intact (unresolvable level file, failed launch)
//! - **Fatal**: the process shuts down cleanly after restoring state
//!
//! Each error includes a recovery action so callers can decide what to do
//! without matching on every variant.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Use the compiled-in default and continue
    UseDefaults,
    /// Recreate the missing file from registry defaults
    RecreateFile,
    /// Abort the current selector transition and keep the previous state
    AbortTransition,
    /// Restore the configuration snapshot taken before the operation
    RestoreBackup,
    /// Perform a safe shutdown
    SafeShutdown,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseDefaults => write!(f, "Using defaults"),
            Self::RecreateFile => write!(f, "Recreating file"),
            Self::AbortTransition => write!(f, "Aborting transition"),
            Self::RestoreBackup => write!(f, "Restoring from backup"),
            Self::SafeShutdown => write!(f, "Performing safe shutdown"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error is recovered locally with a fallback
    Recoverable,
    /// Operation aborted but the front-end keeps running
    Degraded,
    /// Critical error requiring shutdown or user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for Marquee
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Configuration Errors =====
    /// A configuration value could not be parsed
    #[error("Invalid value for {setting}: '{value}' ({reason})")]
    InvalidValue {
        setting: String,
        value: String,
        reason: String,
    },

    /// A level file is missing on disk
    #[error("Configuration file missing: {path}")]
    MissingFile { path: PathBuf },

    /// No platform, emulator or gamelist could be determined
    #[error("No {selector} selected and none discovered")]
    MissingSelector { selector: String },

    /// The file for a level could not be determined from the current selectors
    #[error("Cannot resolve configuration file for level {level} (check '{parameter}')")]
    UnresolvedFileName { level: String, parameter: String },

    /// Configuration file is unreadable or damaged
    #[error("Configuration corrupted: {path}")]
    ConfigurationCorrupted { path: PathBuf },

    // ===== Launch Errors =====
    /// The emulator or a helper program could not be started
    #[error("Failed to launch '{command}': {message}")]
    LaunchFailed { command: String, message: String },

    /// A helper program did not finish in time
    #[error("Launch of '{command}' timed out after {seconds}s")]
    LaunchTimeout { command: String, seconds: u64 },

    /// The launch configuration is inconsistent
    #[error("Invalid launch setup: {reason}")]
    InvalidLaunch { reason: String },

    // ===== File System Errors =====
    /// Permission denied for file operation
    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied { operation: String, path: PathBuf },

    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidValue { .. } | Self::MissingFile { .. } | Self::MissingSelector { .. } => {
                ErrorSeverity::Recoverable
            }

            Self::UnresolvedFileName { .. }
            | Self::LaunchFailed { .. }
            | Self::LaunchTimeout { .. }
            | Self::InvalidLaunch { .. } => ErrorSeverity::Degraded,

            Self::ConfigurationCorrupted { .. }
            | Self::PermissionDenied { .. }
            | Self::InternalError { .. } => ErrorSeverity::Fatal,

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::InvalidValue { .. } | Self::MissingSelector { .. } => RecoveryAction::UseDefaults,
            Self::MissingFile { .. } => RecoveryAction::RecreateFile,
            Self::UnresolvedFileName { .. } | Self::InvalidLaunch { .. } => {
                RecoveryAction::AbortTransition
            }
            Self::LaunchFailed { .. }
            | Self::LaunchTimeout { .. }
            | Self::ConfigurationCorrupted { .. } => RecoveryAction::RestoreBackup,
            Self::InternalError { .. } => RecoveryAction::SafeShutdown,
            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for an on-screen dialog
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidValue { setting, .. } => {
                format!("Setting '{}' has an invalid value, using default.", setting)
            }
            Self::MissingFile { .. } => {
                "A configuration file was missing and has been recreated.".to_string()
            }
            Self::MissingSelector { selector } => {
                format!("No {} found, using the default one.", selector)
            }
            Self::UnresolvedFileName { parameter, .. } => {
                format!("Cannot open configuration, please check '{}'.", parameter)
            }
            Self::ConfigurationCorrupted { .. } => {
                "Configuration is damaged and will be restored.".to_string()
            }
            Self::LaunchFailed { .. } | Self::LaunchTimeout { .. } => {
                "The game could not be started.".to_string()
            }
            Self::InvalidLaunch { reason } => reason.clone(),
            Self::PermissionDenied { .. } => {
                "Permission denied while accessing configuration files.".to_string()
            }
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
            Self::InternalError { .. } => {
                "An unexpected error occurred. The front-end will close.".to_string()
            }
            Self::InvalidArgument { .. } => "Invalid input provided.".to_string(),
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Helper to create a launch error from any error type
    pub fn launch<E: std::error::Error>(command: impl Into<String>, source: E) -> Self {
        Self::LaunchFailed {
            command: command.into(),
            message: source.to_string(),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::MissingFile {
                path: PathBuf::from("unknown"),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: "file operation".to_string(),
                path: PathBuf::from("unknown"),
            },
            _ => Self::IoError {
                message: err.to_string(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_action_display() {
        assert_eq!(RecoveryAction::UseDefaults.to_string(), "Using defaults");
        assert_eq!(RecoveryAction::RecreateFile.to_string(), "Recreating file");
        assert_eq!(
            RecoveryAction::AbortTransition.to_string(),
            "Aborting transition"
        );
        assert_eq!(
            RecoveryAction::RestoreBackup.to_string(),
            "Restoring from backup"
        );
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Recoverable < ErrorSeverity::Degraded);
        assert!(ErrorSeverity::Degraded < ErrorSeverity::Fatal);
    }

    #[test]
    fn test_parse_errors_are_recovered_locally() {
        let err = AppError::InvalidValue {
            setting: "screen_res_x".to_string(),
            value: "wide".to_string(),
            reason: "not an integer".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert_eq!(err.recovery_action(), RecoveryAction::UseDefaults);
        assert!(!err.is_critical());
    }

    #[test]
    fn test_unresolved_file_aborts_transition_only() {
        let err = AppError::UnresolvedFileName {
            level: "LAYOUT".to_string(),
            parameter: "current_layout".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Degraded);
        assert_eq!(err.recovery_action(), RecoveryAction::AbortTransition);
        assert!(err.user_message().contains("current_layout"));
    }

    #[test]
    fn test_launch_failure_restores_backup() {
        let inner = io::Error::new(io::ErrorKind::NotFound, "no such program");
        let err = AppError::launch("mame.exe", inner);
        assert!(matches!(err, AppError::LaunchFailed { .. }));
        assert_eq!(err.recovery_action(), RecoveryAction::RestoreBackup);
        assert!(err.to_string().contains("mame.exe"));
    }

    #[test]
    fn test_internal_error_is_fatal() {
        let err = AppError::InternalError {
            message: "boom".to_string(),
        };
        assert!(err.is_critical());
        assert_eq!(err.recovery_action(), RecoveryAction::SafeShutdown);
        assert!(!err.user_message().contains("boom"));
    }

    #[test]
    fn test_from_io_error_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::MissingFile { .. }));
    }

    #[test]
    fn test_from_io_error_other() {
        let io_err = io::Error::new(io::ErrorKind::Other, "Unknown error");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::IoError { .. }));
    }
}
