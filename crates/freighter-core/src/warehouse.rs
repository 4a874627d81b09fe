//! Warehouse definition and loading

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::subscription::{ImageSubscription, RepoSubscription};

/// A named collection of subscriptions evaluated together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub name: String,

    /// Namespace used to scope credential lookups
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Subscriptions, in evaluation order (`- image: {...}` form)
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub subscriptions: Vec<RepoSubscription>,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Warehouse {
    pub fn new(name: impl Into<String>, subscriptions: Vec<RepoSubscription>) -> Self {
        Self {
            name: name.into(),
            namespace: default_namespace(),
            subscriptions,
        }
    }

    /// Load and validate a warehouse from a YAML file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CoreError::WarehouseNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a warehouse from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let warehouse: Warehouse = serde_yaml::from_str(content)?;
        warehouse.validate()?;
        Ok(warehouse)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField {
                field: "name".to_string(),
            });
        }

        for (idx, sub) in self.subscriptions.iter().enumerate() {
            if let RepoSubscription::Image(image) = sub {
                image.validate().map_err(|e| CoreError::InvalidWarehouse {
                    message: format!("subscription #{}: {}", idx + 1, e),
                })?;
            }
        }

        Ok(())
    }

    /// Image subscriptions, in order
    pub fn image_subscriptions(&self) -> impl Iterator<Item = &ImageSubscription> {
        self.subscriptions.iter().filter_map(RepoSubscription::as_image)
    }
}
