//! Error types for vhost management.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vhost operations.
#[derive(Error, Debug)]
pub enum VhostError {
    /// Configuration-related errors (missing file, missing keys, unknown user).
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Template discovery and rendering errors.
    #[error("Template error: {message}")]
    Template { message: String },

    /// Input validation errors.
    #[error("Validation error: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// The vhost is not in a state that allows the requested transition.
    #[error("{kind}")]
    Precondition { kind: PreconditionKind },

    /// External command failures (reload, database admin, editor).
    #[error("Command error: {kind}")]
    Command { kind: CommandErrorKind },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation error kinds.
#[derive(Error, Debug)]
pub enum ValidationErrorKind {
    #[error("Invalid vhost name '{name}': {message}")]
    InvalidName { name: String, message: String },

    #[error("Path traversal detected in: {path}")]
    PathTraversal { path: PathBuf },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

/// Lifecycle precondition violations.
///
/// These abort the requested operation without being fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionKind {
    #[error("vhost '{name}' already exists, you may want to enable it")]
    AlreadyExists { name: String },

    #[error("vhost '{name}' is already enabled")]
    AlreadyEnabled { name: String },

    #[error("vhost '{name}' is not enabled")]
    NotEnabled { name: String },

    #[error("vhost '{name}' does not exist")]
    NotFound { name: String },

    #[error("you must be root to {action}")]
    NotPermitted { action: String },
}

/// External command error kinds.
#[derive(Error, Debug)]
pub enum CommandErrorKind {
    #[error("Command execution failed: {message}")]
    ExecutionFailed { message: String },
}

impl VhostError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    pub(crate) fn precondition(kind: PreconditionKind) -> Self {
        Self::Precondition { kind }
    }

    pub(crate) fn execution_failed(message: impl Into<String>) -> Self {
        Self::Command {
            kind: CommandErrorKind::ExecutionFailed {
                message: message.into(),
            },
        }
    }

    pub(crate) fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            kind: ValidationErrorKind::InvalidParameter {
                param: param.to_string(),
                message: message.into(),
            },
        }
    }

    /// Returns the precondition kind when this error only skipped an operation.
    pub fn as_precondition(&self) -> Option<&PreconditionKind> {
        match self {
            Self::Precondition { kind } => Some(kind),
            _ => None,
        }
    }

    /// Process exit code for this error.
    ///
    /// Skipped operations exit 0, OS errors carry their errno.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Precondition { kind } => match kind {
                PreconditionKind::NotPermitted { .. } => 1,
                _ => 0,
            },
            Self::Io(e) => e
                .raw_os_error()
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

/// Result type alias for vhost operations.
pub type VhostResult<T> = Result<T, VhostError>;
