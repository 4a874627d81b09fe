//! Freighter Registry Access
//!
//! This crate provides everything needed to pick an image for a subscription:
//!
//! - **Credential lookup**: per-namespace credential stores with exact and
//!   pattern URL matching, global namespaces and Docker config fallback
//! - **Registry boundary**: a four-operation [`Registry`] trait with an OCI
//!   implementation and an in-memory mock
//! - **Selection strategies**: Digest, Tag, SemVer, Lexical and NewestBuild,
//!   with platform filtering for multi-platform images
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use freighter_core::{ImageSubscription, SelectionStrategy};
//! use freighter_registry::{ImageSelector, OciRegistry, RegistrySelector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let selector = RegistrySelector::new(Arc::new(OciRegistry::default()));
//!
//! let subscription = ImageSubscription::new("ghcr.io/acme/api")
//!     .with_strategy(SelectionStrategy::SemVer)
//!     .with_constraint("^1.0");
//!
//! let selected = selector.select(&subscription, None).await?;
//! println!("{}@{}", selected.tag, selected.digest);
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Notes
//!
//! - Credentials are resolved on every lookup and zeroed on drop
//! - Registry responses are never cached

pub mod credentials;
pub mod error;
pub mod mock;
pub mod oci;
pub mod registry;
pub mod selector;

// Re-exports for convenience
pub use credentials::{
    AnonymousCredentialsDb, ClientCertificate, CredentialEntry, CredentialType, Credentials,
    CredentialsConfig, CredentialsDb, FakeCredentialsDb, FileCredentialsDb,
};
pub use error::{CredentialsError, RegistryError, Result};
pub use mock::MockRegistry;
pub use oci::{OciRegistry, OciRegistryConfig};
pub use registry::{PlatformManifest, Registry};
pub use selector::{ImageSelector, RegistrySelector, SelectedImage, SelectorConfig};
