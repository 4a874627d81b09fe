//! OCI registry client
//!
//! Implements the [`Registry`] boundary on top of `oci-distribution`.
//! Credentials are turned into registry auth per call; nothing is cached
//! between calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use freighter_core::Platform;
use oci_distribution::Reference;
use oci_distribution::client::{Client, ClientConfig, ClientProtocol};
use oci_distribution::errors::{OciDistributionError, OciErrorCode};
use oci_distribution::manifest::OciManifest;
use oci_distribution::secrets::RegistryAuth;
use serde::Deserialize;

use crate::credentials::Credentials;
use crate::error::{RegistryError, Result};
use crate::registry::{PlatformManifest, Registry, strip_scheme};

/// Tags requested per page when listing a repository
const TAGS_PAGE_SIZE: usize = 100;

/// OCI client configuration
#[derive(Debug, Clone, Default)]
pub struct OciRegistryConfig {
    /// Registries (host or host:port) reached over plain HTTP
    pub insecure_registries: Vec<String>,
}

/// OCI registry client
pub struct OciRegistry {
    client: Client,
}

impl OciRegistry {
    /// Create a new OCI registry client
    pub fn new(config: OciRegistryConfig) -> Self {
        let protocol = if config.insecure_registries.is_empty() {
            ClientProtocol::Https
        } else {
            ClientProtocol::HttpsExcept(config.insecure_registries)
        };

        let client_config = ClientConfig {
            protocol,
            ..Default::default()
        };
        Self {
            client: Client::new(client_config),
        }
    }

    /// Build an OCI reference from a repository URL and tag
    ///
    /// Format: [oci://]registry/repo + tag -> registry/repo:tag
    pub fn reference(repo_url: &str, tag: &str) -> Result<Reference> {
        let base = strip_scheme(repo_url).trim_end_matches('/');
        let full_ref = format!("{}:{}", base, tag);

        Reference::try_from(full_ref.as_str()).map_err(|e| RegistryError::InvalidReference {
            reference: full_ref.clone(),
            message: e.to_string(),
        })
    }

    fn auth(credentials: Option<&Credentials>) -> RegistryAuth {
        match credentials {
            Some(creds) => {
                if creds.client_certificate.is_some() {
                    tracing::warn!(
                        "Client certificates are not supported for OCI registries, ignoring"
                    );
                }
                RegistryAuth::Basic(creds.username.clone(), creds.password.clone())
            }
            None => RegistryAuth::Anonymous,
        }
    }

    async fn pull_manifest(
        &self,
        repo_url: &str,
        reference: &Reference,
        auth: &RegistryAuth,
    ) -> Result<OciManifest> {
        let (manifest, _digest) = self
            .client
            .pull_manifest(reference, auth)
            .await
            .map_err(|e| map_error(repo_url, &reference.whole(), e))?;
        Ok(manifest)
    }
}

impl Default for OciRegistry {
    fn default() -> Self {
        Self::new(OciRegistryConfig::default())
    }
}

/// Classify a client error as "not found" or "unreachable"
fn map_error(repo_url: &str, reference: &str, e: OciDistributionError) -> RegistryError {
    let not_found = match &e {
        OciDistributionError::ImageManifestNotFoundError(_) => true,
        OciDistributionError::ServerError { code, .. } => *code == 404,
        OciDistributionError::RegistryError { envelope, .. } => envelope.errors.iter().any(|err| {
            matches!(
                err.code,
                OciErrorCode::ManifestUnknown | OciErrorCode::NameUnknown
            )
        }),
        _ => false,
    };

    if not_found {
        RegistryError::ReferenceNotFound {
            reference: reference.to_string(),
        }
    } else {
        RegistryError::Unreachable {
            repo_url: repo_url.to_string(),
            message: e.to_string(),
        }
    }
}

/// The parts of an OCI image configuration we read
#[derive(Debug, Deserialize)]
struct ImageConfig {
    #[serde(default)]
    created: Option<DateTime<Utc>>,
}

fn parse_created(reference: &str, config: &str) -> Result<DateTime<Utc>> {
    let config: ImageConfig =
        serde_json::from_str(config).map_err(|e| RegistryError::Other(format!(
            "invalid image configuration for {}: {}",
            reference, e
        )))?;

    Ok(config.created.unwrap_or_else(|| {
        tracing::debug!("{} has no creation time, treating it as oldest", reference);
        DateTime::<Utc>::UNIX_EPOCH
    }))
}

#[async_trait]
impl Registry for OciRegistry {
    async fn list_tags(
        &self,
        repo_url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<String>> {
        let reference = Self::reference(repo_url, "latest")?;
        let auth = Self::auth(credentials);

        let mut tags = Vec::new();
        let mut last: Option<String> = None;
        loop {
            let page = self
                .client
                .list_tags(&reference, &auth, Some(TAGS_PAGE_SIZE), last.as_deref())
                .await
                .map_err(|e| map_error(repo_url, repo_url, e))?;

            let count = page.tags.len();
            let page_last = page.tags.last().cloned();
            // A registry that ignores `last` keeps returning the same page
            if page_last.is_none() || page_last == last {
                break;
            }
            tags.extend(page.tags);
            if count < TAGS_PAGE_SIZE {
                break;
            }
            last = page_last;
        }

        tracing::debug!("{} has {} tags", repo_url, tags.len());
        Ok(tags)
    }

    async fn digest(
        &self,
        repo_url: &str,
        tag: &str,
        credentials: Option<&Credentials>,
    ) -> Result<String> {
        let reference = Self::reference(repo_url, tag)?;
        let auth = Self::auth(credentials);

        self.client
            .fetch_manifest_digest(&reference, &auth)
            .await
            .map_err(|e| map_error(repo_url, &reference.whole(), e))
    }

    async fn platforms(
        &self,
        repo_url: &str,
        tag: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Option<Vec<PlatformManifest>>> {
        let reference = Self::reference(repo_url, tag)?;
        let auth = Self::auth(credentials);

        match self.pull_manifest(repo_url, &reference, &auth).await? {
            OciManifest::Image(_) => Ok(None),
            OciManifest::ImageIndex(index) => Ok(Some(
                index
                    .manifests
                    .into_iter()
                    .filter_map(|entry| {
                        let platform = entry.platform?;
                        Some(PlatformManifest {
                            os: platform.os,
                            architecture: platform.architecture,
                            variant: platform.variant,
                            digest: entry.digest,
                        })
                    })
                    .collect(),
            )),
        }
    }

    async fn created_at(
        &self,
        repo_url: &str,
        tag: &str,
        platform: Option<&Platform>,
        credentials: Option<&Credentials>,
    ) -> Result<DateTime<Utc>> {
        let reference = Self::reference(repo_url, tag)?;
        let auth = Self::auth(credentials);

        // Without a constraint the client's own platform resolver picks an
        // entry from an index.
        let image_ref = match platform {
            None => reference,
            Some(wanted) => match self.pull_manifest(repo_url, &reference, &auth).await? {
                OciManifest::Image(_) => reference,
                OciManifest::ImageIndex(index) => {
                    let entry = index
                        .manifests
                        .into_iter()
                        .find(|entry| {
                            entry
                                .platform
                                .as_ref()
                                .map(|p| wanted.matches(&p.os, &p.architecture, p.variant.as_deref()))
                                .unwrap_or(false)
                        })
                        .ok_or_else(|| RegistryError::PlatformNotFound {
                            reference: reference.whole(),
                            platform: wanted.to_string(),
                        })?;
                    Reference::with_digest(
                        reference.registry().to_string(),
                        reference.repository().to_string(),
                        entry.digest,
                    )
                }
            },
        };

        let (_manifest, _digest, config) = self
            .client
            .pull_manifest_and_config(&image_ref, &auth)
            .await
            .map_err(|e| map_error(repo_url, &image_ref.whole(), e))?;

        parse_created(&image_ref.whole(), &config)
    }
}
