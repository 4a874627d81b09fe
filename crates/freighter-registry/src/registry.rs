//! Registry boundary
//!
//! The selector only needs four read operations from a registry. Transport and
//! protocol details live behind this trait so selection logic can run against
//! an OCI registry or an in-memory fake alike.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use freighter_core::Platform;

use crate::credentials::Credentials;
use crate::error::Result;

/// Registry host used for references without an explicit registry
pub const DOCKER_HUB: &str = "docker.io";

/// One entry of a multi-platform manifest list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformManifest {
    pub os: String,
    pub architecture: String,
    pub variant: Option<String>,
    /// Digest of the platform-specific manifest
    pub digest: String,
}

impl PlatformManifest {
    pub fn new(
        os: impl Into<String>,
        architecture: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            os: os.into(),
            architecture: architecture.into(),
            variant: None,
            digest: digest.into(),
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn satisfies(&self, platform: &Platform) -> bool {
        platform.matches(&self.os, &self.architecture, self.variant.as_deref())
    }
}

/// Read access to an image registry
///
/// Every call is a live query; implementations must not cache. Dropping the
/// returned future cancels the request.
#[async_trait]
pub trait Registry: Send + Sync {
    /// List all tags of a repository
    async fn list_tags(
        &self,
        repo_url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<String>>;

    /// Digest of the manifest a tag currently points at
    async fn digest(
        &self,
        repo_url: &str,
        tag: &str,
        credentials: Option<&Credentials>,
    ) -> Result<String>;

    /// Platform entries of a tag, or `None` for a single-platform manifest
    async fn platforms(
        &self,
        repo_url: &str,
        tag: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Option<Vec<PlatformManifest>>>;

    /// Creation time recorded in the image configuration
    async fn created_at(
        &self,
        repo_url: &str,
        tag: &str,
        platform: Option<&Platform>,
        credentials: Option<&Credentials>,
    ) -> Result<DateTime<Utc>>;
}

/// Strip a URL scheme from a repository reference
pub fn strip_scheme(repo_url: &str) -> &str {
    let trimmed = repo_url.trim();
    ["oci://", "https://", "http://", "docker://"]
        .iter()
        .find_map(|scheme| trimmed.strip_prefix(scheme))
        .unwrap_or(trimmed)
}

/// Registry host of an image repository (`docker.io` when implicit)
pub fn registry_host(repo_url: &str) -> &str {
    let reference = strip_scheme(repo_url);
    match reference.split_once('/') {
        Some((first, _))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            first
        }
        _ => DOCKER_HUB,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_host() {
        assert_eq!(registry_host("ghcr.io/acme/api"), "ghcr.io");
        assert_eq!(registry_host("oci://ghcr.io/acme/api"), "ghcr.io");
        assert_eq!(registry_host("localhost:5000/app"), "localhost:5000");
        assert_eq!(registry_host("localhost/app"), "localhost");
        assert_eq!(registry_host("nginx"), DOCKER_HUB);
        assert_eq!(registry_host("library/nginx"), DOCKER_HUB);
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("oci://ghcr.io/a"), "ghcr.io/a");
        assert_eq!(strip_scheme(" https://ghcr.io/a "), "ghcr.io/a");
        assert_eq!(strip_scheme("ghcr.io/a"), "ghcr.io/a");
    }

    #[test]
    fn test_platform_manifest_satisfies() {
        let entry = PlatformManifest::new("linux", "arm64", "sha256:1").with_variant("v8");
        assert!(entry.satisfies(&Platform::new("linux", "arm64")));
        assert!(entry.satisfies(&Platform::new("linux", "arm64").with_variant("v8")));
        assert!(!entry.satisfies(&Platform::new("linux", "amd64")));
    }
}
