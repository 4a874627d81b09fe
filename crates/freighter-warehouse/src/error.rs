//! Discovery error types

use freighter_registry::{CredentialsError, RegistryError};
use thiserror::Error;

/// A discovery pass failed; no partial result is produced
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("error obtaining credentials for image repository `{repo_url}`: {source}")]
    Credentials {
        repo_url: String,
        #[source]
        source: CredentialsError,
    },

    #[error("error getting latest suitable image for repository `{repo_url}`: {source}")]
    ImageSelection {
        repo_url: String,
        #[source]
        source: RegistryError,
    },

    #[error(transparent)]
    InvalidWarehouse(#[from] freighter_core::CoreError),
}

impl DiscoveryError {
    /// Repository whose resolution failed
    pub fn repo_url(&self) -> Option<&str> {
        match self {
            Self::Credentials { repo_url, .. } | Self::ImageSelection { repo_url, .. } => {
                Some(repo_url)
            }
            Self::InvalidWarehouse(_) => None,
        }
    }

    /// Whether the next discovery pass may succeed without a config change
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ImageSelection { source, .. } => source.is_transient(),
            Self::Credentials { .. } | Self::InvalidWarehouse(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
