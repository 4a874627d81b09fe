//! Image selection strategies
//!
//! Picks one tag of an image repository according to the subscription's
//! [`SelectionStrategy`], then resolves the digest it currently points at.
//! Every call queries the registry afresh; nothing is cached or retried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use freighter_core::{ImageSubscription, SelectionStrategy};
use futures::stream::{self, StreamExt, TryStreamExt};
use semver::{Version, VersionReq};
use std::sync::Arc;

use crate::credentials::Credentials;
use crate::error::{RegistryError, Result};
use crate::registry::Registry;

/// Tag pinned by Digest and Tag subscriptions without a constraint
pub const DEFAULT_TAG: &str = "latest";

/// Default number of concurrent metadata lookups for NewestBuild
pub const DEFAULT_METADATA_CONCURRENCY: usize = 8;

/// The image chosen for a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub tag: String,
    pub digest: String,
}

impl SelectedImage {
    pub fn new(tag: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            digest: digest.into(),
        }
    }
}

/// Chooses an image for a subscription
#[async_trait]
pub trait ImageSelector: Send + Sync {
    async fn select(
        &self,
        subscription: &ImageSubscription,
        credentials: Option<&Credentials>,
    ) -> Result<SelectedImage>;
}

/// Selector tuning
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Upper bound on concurrent creation-time lookups
    pub metadata_concurrency: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            metadata_concurrency: DEFAULT_METADATA_CONCURRENCY,
        }
    }
}

/// [`ImageSelector`] backed by a [`Registry`]
pub struct RegistrySelector {
    registry: Arc<dyn Registry>,
    config: SelectorConfig,
}

impl RegistrySelector {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            config: SelectorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    async fn select_tag(
        &self,
        subscription: &ImageSubscription,
        credentials: Option<&Credentials>,
    ) -> Result<String> {
        let repo_url = subscription.repo_url.as_str();

        match subscription.strategy {
            SelectionStrategy::Digest => {
                let tag = pinned_tag(subscription);
                let tags = self.registry.list_tags(repo_url, credentials).await?;
                if !tags.iter().any(|t| t == tag) {
                    return Err(RegistryError::ReferenceNotFound {
                        reference: format!("{}:{}", repo_url, tag),
                    });
                }
                Ok(tag.to_string())
            }
            SelectionStrategy::Tag => Ok(pinned_tag(subscription).to_string()),
            SelectionStrategy::SemVer => {
                let requirement = subscription
                    .effective_constraint()
                    .map(parse_requirement)
                    .transpose()?;
                let candidates = self.candidates(subscription, credentials).await?;
                select_semver(repo_url, candidates, requirement.as_ref())
            }
            SelectionStrategy::Lexical => {
                let candidates = self.candidates(subscription, credentials).await?;
                candidates
                    .into_iter()
                    .max()
                    .ok_or_else(|| no_eligible_tag(repo_url, "no candidate tags"))
            }
            SelectionStrategy::NewestBuild => {
                let candidates = self.candidates(subscription, credentials).await?;
                self.select_newest_build(subscription, candidates, credentials)
                    .await
            }
        }
    }

    /// Listed tags that pass the subscription's allow/ignore filters
    async fn candidates(
        &self,
        subscription: &ImageSubscription,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<String>> {
        let repo_url = subscription.repo_url.as_str();
        let filter = subscription.tag_filter()?;

        let tags = self.registry.list_tags(repo_url, credentials).await?;
        if tags.is_empty() {
            return Err(no_eligible_tag(repo_url, "repository has no tags"));
        }

        let total = tags.len();
        let candidates: Vec<String> = tags.into_iter().filter(|t| filter.allows(t)).collect();
        if candidates.is_empty() {
            return Err(no_eligible_tag(
                repo_url,
                &format!("none of {} tags pass the allow/ignore filters", total),
            ));
        }
        Ok(candidates)
    }

    async fn select_newest_build(
        &self,
        subscription: &ImageSubscription,
        candidates: Vec<String>,
        credentials: Option<&Credentials>,
    ) -> Result<String> {
        let repo_url = subscription.repo_url.as_str();
        let platform = subscription.platform.as_ref();
        let registry = &self.registry;

        let stamped: Vec<Option<(DateTime<Utc>, String)>> = stream::iter(candidates)
            .map(|tag| async move {
                match registry
                    .created_at(repo_url, &tag, platform, credentials)
                    .await
                {
                    Ok(created) => Ok(Some((created, tag))),
                    // Tags not built for the wanted platform are not candidates
                    Err(RegistryError::PlatformNotFound { .. }) => {
                        tracing::debug!("Skipping {}:{}, no matching platform", repo_url, tag);
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .buffer_unordered(self.config.metadata_concurrency.max(1))
            .try_collect()
            .await?;

        // Tuple ordering: newest first, then lexically greatest tag
        stamped
            .into_iter()
            .flatten()
            .max()
            .map(|(_, tag)| tag)
            .ok_or_else(|| match platform {
                Some(p) => no_eligible_tag(repo_url, &format!("no tag has an image for {}", p)),
                None => no_eligible_tag(repo_url, "no candidate tags"),
            })
    }

    /// Digest for a tag, narrowed to the subscribed platform when the tag is
    /// a manifest list
    async fn resolve_digest(
        &self,
        subscription: &ImageSubscription,
        tag: &str,
        credentials: Option<&Credentials>,
    ) -> Result<String> {
        let repo_url = subscription.repo_url.as_str();

        let Some(platform) = &subscription.platform else {
            return self.registry.digest(repo_url, tag, credentials).await;
        };

        match self.registry.platforms(repo_url, tag, credentials).await? {
            None => self.registry.digest(repo_url, tag, credentials).await,
            Some(entries) => entries
                .into_iter()
                .find(|entry| entry.satisfies(platform))
                .map(|entry| entry.digest)
                .ok_or_else(|| RegistryError::PlatformNotFound {
                    reference: format!("{}:{}", repo_url, tag),
                    platform: platform.to_string(),
                }),
        }
    }
}

#[async_trait]
impl ImageSelector for RegistrySelector {
    async fn select(
        &self,
        subscription: &ImageSubscription,
        credentials: Option<&Credentials>,
    ) -> Result<SelectedImage> {
        subscription.validate()?;

        let tag = self.select_tag(subscription, credentials).await?;
        let digest = self.resolve_digest(subscription, &tag, credentials).await?;

        tracing::debug!(
            "Selected {}:{} ({}) using {}",
            subscription.repo_url,
            tag,
            digest,
            subscription.strategy
        );
        Ok(SelectedImage { tag, digest })
    }
}

fn pinned_tag(subscription: &ImageSubscription) -> &str {
    subscription.effective_constraint().unwrap_or(DEFAULT_TAG)
}

fn no_eligible_tag(repo_url: &str, reason: &str) -> RegistryError {
    RegistryError::NoEligibleTag {
        repo_url: repo_url.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_requirement(constraint: &str) -> Result<VersionReq> {
    VersionReq::parse(constraint).map_err(|e| RegistryError::InvalidConstraint {
        constraint: constraint.to_string(),
        message: e.to_string(),
    })
}

/// Parse a tag as a semantic version, accepting a leading `v`
pub fn parse_tag_version(tag: &str) -> Option<Version> {
    let raw = tag.strip_prefix('v').unwrap_or(tag);
    Version::parse(raw).ok()
}

fn select_semver(
    repo_url: &str,
    candidates: Vec<String>,
    requirement: Option<&VersionReq>,
) -> Result<String> {
    let versioned: Vec<(Version, String)> = candidates
        .into_iter()
        .filter_map(|tag| parse_tag_version(&tag).map(|v| (v, tag)))
        .collect();

    if versioned.is_empty() {
        return Err(no_eligible_tag(repo_url, "no tag is a semantic version"));
    }

    versioned
        .into_iter()
        .filter(|(v, _)| requirement.map(|req| req.matches(v)).unwrap_or(true))
        .max_by(|(va, ta), (vb, tb)| va.cmp(vb).then_with(|| ta.cmp(tb)))
        .map(|(_, tag)| tag)
        .ok_or_else(|| match requirement {
            Some(req) => no_eligible_tag(repo_url, &format!("no version satisfies {}", req)),
            None => no_eligible_tag(repo_url, "no candidate tags"),
        })
}
