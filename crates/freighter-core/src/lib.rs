//! Freighter Core - types shared by the artifact discovery crates
//!
//! - `RepoSubscription` / `ImageSubscription`: what to watch and how to pick
//! - `SelectionStrategy`: digest pin, tag pin, semver, lexical, newest build
//! - `Platform`: OS/architecture filter for multi-platform images
//! - `Image`: an immutable discovered reference
//! - `Freight`: the bundle assembled from one discovery pass
//! - `Warehouse`: a named, ordered set of subscriptions loaded from YAML

pub mod error;
pub mod freight;
pub mod image;
pub mod platform;
pub mod subscription;
pub mod warehouse;

pub use error::{CoreError, Result};
pub use freight::{Freight, freight_id};
pub use image::Image;
pub use platform::Platform;
pub use subscription::{
    ChartSubscription, GitSubscription, ImageSubscription, RepoSubscription, SelectionStrategy,
    TagFilter,
};
pub use warehouse::Warehouse;
