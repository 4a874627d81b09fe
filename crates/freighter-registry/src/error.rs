//! Error types for credential lookup and registry access

use thiserror::Error;

/// Credential store errors
///
/// Absence of credentials is never an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("invalid credentials request: {message}")]
    InvalidRequest { message: String },

    /// The store itself is unreachable or malformed
    #[error("credential store lookup failed: {message}")]
    Lookup { message: String },
}

impl CredentialsError {
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CredentialsError {
    fn from(e: std::io::Error) -> Self {
        CredentialsError::lookup(e.to_string())
    }
}

impl From<serde_yaml::Error> for CredentialsError {
    fn from(e: serde_yaml::Error) -> Self {
        CredentialsError::lookup(format!("malformed credential store: {}", e))
    }
}

impl From<serde_json::Error> for CredentialsError {
    fn from(e: serde_json::Error) -> Self {
        CredentialsError::lookup(format!("malformed docker config: {}", e))
    }
}

/// Registry and image selection errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Network or authentication failure reaching the registry
    #[error("registry unreachable for {repo_url}: {message}")]
    Unreachable { repo_url: String, message: String },

    #[error("reference not found: {reference}")]
    ReferenceNotFound { reference: String },

    #[error("no manifest for platform {platform} in {reference}")]
    PlatformNotFound { reference: String, platform: String },

    #[error("no eligible tag found in {repo_url}: {reason}")]
    NoEligibleTag { repo_url: String, reason: String },

    #[error("invalid constraint '{constraint}': {message}")]
    InvalidConstraint { constraint: String, message: String },

    #[error("invalid image reference '{reference}': {message}")]
    InvalidReference { reference: String, message: String },

    #[error("invalid subscription: {message}")]
    InvalidSubscription { message: String },

    #[error("{0}")]
    Other(String),
}

impl RegistryError {
    /// Whether retrying later without a configuration change may help
    pub fn is_transient(&self) -> bool {
        matches!(self, RegistryError::Unreachable { .. })
    }
}

impl From<freighter_core::CoreError> for RegistryError {
    fn from(e: freighter_core::CoreError) -> Self {
        RegistryError::InvalidSubscription {
            message: e.to_string(),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
