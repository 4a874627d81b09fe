//! Mock registry for testing
//!
//! Serves tags, digests, platform lists and build times from memory so the
//! selection strategies can be exercised without a live registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use freighter_core::Platform;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::credentials::Credentials;
use crate::error::{RegistryError, Result};
use crate::registry::{PlatformManifest, Registry};

/// In-memory registry for testing
#[derive(Clone, Default)]
pub struct MockRegistry {
    /// Storage: repo URL -> repository
    repos: Arc<RwLock<HashMap<String, MockRepository>>>,
    /// Repositories that fail as if the registry were down
    unreachable: Arc<RwLock<HashSet<String>>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<OperationCounts>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Default)]
struct MockRepository {
    /// Tags in push order
    tags: Vec<String>,
    images: HashMap<String, MockImage>,
}

#[derive(Debug, Clone)]
struct MockImage {
    digest: String,
    created: DateTime<Utc>,
    platforms: Option<Vec<PlatformManifest>>,
    /// Build time per platform manifest digest
    platform_created: HashMap<String, DateTime<Utc>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone)]
pub struct OperationCounts {
    pub tag_lists: usize,
    pub digests: usize,
    pub platform_lookups: usize,
    pub created_lookups: usize,
}

impl MockRegistry {
    /// Create a new empty mock registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository without any tags
    pub fn with_repository(self, repo_url: &str) -> Self {
        self.repos
            .write()
            .unwrap()
            .entry(repo_url.to_string())
            .or_default();
        self
    }

    /// Push a tag pointing at a digest
    pub fn with_image(self, repo_url: &str, tag: &str, digest: &str) -> Self {
        {
            let mut repos = self.repos.write().unwrap();
            let repo = repos.entry(repo_url.to_string()).or_default();
            if !repo.tags.iter().any(|t| t == tag) {
                repo.tags.push(tag.to_string());
            }
            repo.images.insert(
                tag.to_string(),
                MockImage {
                    digest: digest.to_string(),
                    created: DateTime::<Utc>::UNIX_EPOCH,
                    platforms: None,
                    platform_created: HashMap::new(),
                },
            );
        }
        self
    }

    /// Set the build time of a previously pushed tag
    pub fn with_created(self, repo_url: &str, tag: &str, created: DateTime<Utc>) -> Self {
        self.update_image(repo_url, tag, |image| image.created = created);
        self
    }

    /// Turn a previously pushed tag into a manifest list
    pub fn with_platforms(
        self,
        repo_url: &str,
        tag: &str,
        platforms: Vec<PlatformManifest>,
    ) -> Self {
        self.update_image(repo_url, tag, |image| image.platforms = Some(platforms));
        self
    }

    /// Set the build time of one platform manifest of a tag
    pub fn with_platform_created(
        self,
        repo_url: &str,
        tag: &str,
        digest: &str,
        created: DateTime<Utc>,
    ) -> Self {
        self.update_image(repo_url, tag, |image| {
            image.platform_created.insert(digest.to_string(), created);
        });
        self
    }

    /// Make every call for a repository fail as unreachable
    pub fn set_unreachable(&self, repo_url: &str) {
        self.unreachable.write().unwrap().insert(repo_url.to_string());
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// Highest number of concurrent `created_at` calls observed
    pub fn max_concurrent_created_lookups(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn update_image(&self, repo_url: &str, tag: &str, f: impl FnOnce(&mut MockImage)) {
        let mut repos = self.repos.write().unwrap();
        if let Some(image) = repos
            .get_mut(repo_url)
            .and_then(|repo| repo.images.get_mut(tag))
        {
            f(image);
        }
    }

    fn check_reachable(&self, repo_url: &str) -> Result<()> {
        if self.unreachable.read().unwrap().contains(repo_url) {
            return Err(RegistryError::Unreachable {
                repo_url: repo_url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn image(&self, repo_url: &str, tag: &str) -> Result<MockImage> {
        let repos = self.repos.read().unwrap();
        repos
            .get(repo_url)
            .and_then(|repo| repo.images.get(tag))
            .cloned()
            .ok_or_else(|| RegistryError::ReferenceNotFound {
                reference: format!("{}:{}", repo_url, tag),
            })
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn list_tags(
        &self,
        repo_url: &str,
        _credentials: Option<&Credentials>,
    ) -> Result<Vec<String>> {
        {
            let mut ops = self.operations.write().unwrap();
            ops.tag_lists += 1;
        }
        self.check_reachable(repo_url)?;

        let repos = self.repos.read().unwrap();
        repos
            .get(repo_url)
            .map(|repo| repo.tags.clone())
            .ok_or_else(|| RegistryError::ReferenceNotFound {
                reference: repo_url.to_string(),
            })
    }

    async fn digest(
        &self,
        repo_url: &str,
        tag: &str,
        _credentials: Option<&Credentials>,
    ) -> Result<String> {
        {
            let mut ops = self.operations.write().unwrap();
            ops.digests += 1;
        }
        self.check_reachable(repo_url)?;

        Ok(self.image(repo_url, tag)?.digest)
    }

    async fn platforms(
        &self,
        repo_url: &str,
        tag: &str,
        _credentials: Option<&Credentials>,
    ) -> Result<Option<Vec<PlatformManifest>>> {
        {
            let mut ops = self.operations.write().unwrap();
            ops.platform_lookups += 1;
        }
        self.check_reachable(repo_url)?;

        Ok(self.image(repo_url, tag)?.platforms)
    }

    async fn created_at(
        &self,
        repo_url: &str,
        tag: &str,
        platform: Option<&Platform>,
        _credentials: Option<&Credentials>,
    ) -> Result<DateTime<Utc>> {
        {
            let mut ops = self.operations.write().unwrap();
            ops.created_lookups += 1;
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        // Give other lookups a chance to start
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.check_reachable(repo_url)?;
        let image = self.image(repo_url, tag)?;

        match (platform, &image.platforms) {
            (Some(wanted), Some(entries)) => {
                let entry = entries.iter().find(|e| e.satisfies(wanted)).ok_or_else(|| {
                    RegistryError::PlatformNotFound {
                        reference: format!("{}:{}", repo_url, tag),
                        platform: wanted.to_string(),
                    }
                })?;
                Ok(image
                    .platform_created
                    .get(&entry.digest)
                    .copied()
                    .unwrap_or(image.created))
            }
            _ => Ok(image.created),
        }
    }
}
