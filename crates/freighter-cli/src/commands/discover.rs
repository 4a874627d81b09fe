//! Discover command - resolve a warehouse's subscriptions to images

use console::style;
use freighter_core::Warehouse;
use freighter_registry::{
    AnonymousCredentialsDb, CredentialsDb, FileCredentialsDb, OciRegistry, OciRegistryConfig,
    RegistrySelector, SelectorConfig,
};
use freighter_warehouse::ImageDiscoverer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::display::{self, ImageRow};
use crate::error::{CliError, Result};

pub struct DiscoverOptions {
    pub credentials: Option<PathBuf>,
    pub insecure_registries: Vec<String>,
    pub timeout_secs: u64,
    pub metadata_concurrency: usize,
    pub json: bool,
}

pub async fn run(warehouse_path: &Path, options: DiscoverOptions) -> Result<()> {
    let warehouse = Warehouse::load_from(warehouse_path)?;

    if !options.json {
        println!(
            "{} Discovering images for warehouse {} ({} subscription(s))",
            style("→").blue(),
            style(&warehouse.name).bold(),
            warehouse.subscriptions.len()
        );
    }

    let credentials = open_credentials(options.credentials.as_deref())?;
    let registry = OciRegistry::new(OciRegistryConfig {
        insecure_registries: options.insecure_registries,
    });
    let selector = RegistrySelector::new(Arc::new(registry)).with_config(SelectorConfig {
        metadata_concurrency: options.metadata_concurrency,
    });
    let discoverer = ImageDiscoverer::new(credentials, Arc::new(selector));

    let freight = tokio::time::timeout(
        Duration::from_secs(options.timeout_secs),
        discoverer.discover_freight(&warehouse),
    )
    .await
    .map_err(|_| CliError::timeout(options.timeout_secs))??;

    if options.json {
        let json = serde_json::to_string_pretty(&freight)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    // Images come back in image-subscription order
    let rows: Vec<ImageRow<'_>> = warehouse
        .image_subscriptions()
        .zip(&freight.images)
        .map(|(subscription, image)| ImageRow {
            image,
            source_url: subscription
                .git_repo_url
                .as_deref()
                .map(|base| discoverer.image_source_url(base, &image.tag))
                .filter(|url| !url.is_empty()),
        })
        .collect();

    display::print_freight(&freight, &rows);
    Ok(())
}

/// Credential store for this run
///
/// An explicit path must exist. Otherwise the default location is used when
/// present, and registries are accessed anonymously when it is not.
fn open_credentials(explicit: Option<&Path>) -> Result<Arc<dyn CredentialsDb>> {
    if let Some(path) = explicit {
        return Ok(Arc::new(FileCredentialsDb::open(path)?));
    }

    match FileCredentialsDb::default_path().filter(|p| p.exists()) {
        Some(path) => {
            tracing::debug!("Using credentials from {}", path.display());
            Ok(Arc::new(FileCredentialsDb::open(path)?))
        }
        None => {
            tracing::debug!("No credential store found, registries are accessed anonymously");
            Ok(Arc::new(AnonymousCredentialsDb))
        }
    }
}
