//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use freighter_core::CoreError;
use freighter_registry::CredentialsError;
use freighter_warehouse::DiscoveryError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Warehouse file missing or invalid
    #[error("Warehouse error: {message}")]
    #[diagnostic(code(freighter::cli::warehouse))]
    Warehouse {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Credential store could not be read
    #[error("Credentials error: {message}")]
    #[diagnostic(code(freighter::cli::credentials))]
    Credentials {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// No suitable image for a subscription
    #[error("Discovery failed: {message}")]
    #[diagnostic(code(freighter::cli::discovery))]
    Discovery { message: String },

    /// Registry unreachable; retrying may help
    #[error("Discovery failed: {message}")]
    #[diagnostic(
        code(freighter::cli::unavailable),
        help("The registry may be temporarily unavailable; try again later")
    )]
    Unavailable { message: String },

    #[error("Discovery timed out after {seconds}s")]
    #[diagnostic(
        code(freighter::cli::timeout),
        help("Increase --timeout or check registry connectivity")
    )]
    Timeout { seconds: u64 },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(freighter::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(freighter::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Warehouse { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Credentials { .. } => exit_codes::CREDENTIALS_ERROR,
            CliError::Discovery { .. } => exit_codes::DISCOVERY_ERROR,
            CliError::Unavailable { .. } | CliError::Timeout { .. } => exit_codes::UNAVAILABLE,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::WarehouseNotFound { .. } => CliError::Warehouse {
                message: err.to_string(),
                help: Some("Pass the path to a warehouse YAML file".to_string()),
            },
            CoreError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
            other => CliError::Warehouse {
                message: other.to_string(),
                help: None,
            },
        }
    }
}

impl From<CredentialsError> for CliError {
    fn from(err: CredentialsError) -> Self {
        CliError::Credentials {
            message: err.to_string(),
            help: Some(
                "Check the file passed with --credentials or FREIGHTER_CREDENTIALS".to_string(),
            ),
        }
    }
}

impl From<DiscoveryError> for CliError {
    fn from(err: DiscoveryError) -> Self {
        let message = err.to_string();
        if err.is_transient() {
            return CliError::Unavailable { message };
        }
        match err {
            DiscoveryError::InvalidWarehouse(e) => e.into(),
            DiscoveryError::Credentials { .. } => CliError::Credentials {
                message,
                help: None,
            },
            DiscoveryError::ImageSelection { .. } => CliError::Discovery { message },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
