//! Freight - the candidate release bundle assembled from one discovery pass

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::image::Image;

/// A set of artifacts discovered together for one warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freight {
    /// Content-derived identifier, stable for a given set of artifacts
    pub id: String,
    /// Warehouse the artifacts were discovered for
    pub warehouse: String,
    pub images: Vec<Image>,
    pub created_at: DateTime<Utc>,
}

impl Freight {
    pub fn new(warehouse: impl Into<String>, images: Vec<Image>) -> Self {
        Self {
            id: freight_id(&images),
            warehouse: warehouse.into(),
            images,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Hash the artifact set into an identifier
///
/// Artifacts are sorted first so the id does not depend on subscription order.
pub fn freight_id(images: &[Image]) -> String {
    let mut artifacts: Vec<String> = images.iter().map(Image::reference).collect();
    artifacts.sort();

    let mut hasher = Sha1::new();
    hasher.update(artifacts.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}
