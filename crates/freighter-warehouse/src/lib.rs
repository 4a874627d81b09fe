//! Freighter Warehouse - image discovery for warehouse subscriptions
//!
//! An [`ImageDiscoverer`] walks a warehouse's subscriptions in order, looks up
//! credentials for each image repository, asks an
//! [`ImageSelector`](freighter_registry::ImageSelector) for the best image and
//! returns the full list or the first error.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use freighter_core::Warehouse;
//! use freighter_registry::{AnonymousCredentialsDb, OciRegistry, RegistrySelector};
//! use freighter_warehouse::ImageDiscoverer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let selector = RegistrySelector::new(Arc::new(OciRegistry::default()));
//! let discoverer = ImageDiscoverer::new(Arc::new(AnonymousCredentialsDb), Arc::new(selector));
//!
//! let warehouse = Warehouse::load_from("warehouse.yaml")?;
//! let freight = discoverer.discover_freight(&warehouse).await?;
//! println!("{}", freight.id);
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod source;

pub use discovery::ImageDiscoverer;
pub use error::{DiscoveryError, Result};
pub use source::{SourceUrlFn, SourceUrlTable, canonical_base_url};
