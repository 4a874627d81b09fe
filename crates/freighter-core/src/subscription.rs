//! Repository subscriptions
//!
//! A subscription points at an external artifact source and carries the
//! policy used to pick one artifact version among many candidates.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::platform::Platform;

/// A subscription to one artifact source
///
/// Only [`RepoSubscription::Image`] is resolved by the image discovery engine;
/// the other variants belong to collaborating resolvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoSubscription {
    Image(ImageSubscription),
    Git(GitSubscription),
    Chart(ChartSubscription),
}

impl RepoSubscription {
    /// The subscribed repository URL, whatever the kind
    pub fn repo_url(&self) -> &str {
        match self {
            Self::Image(sub) => &sub.repo_url,
            Self::Git(sub) => &sub.repo_url,
            Self::Chart(sub) => &sub.repo_url,
        }
    }

    pub fn as_image(&self) -> Option<&ImageSubscription> {
        match self {
            Self::Image(sub) => Some(sub),
            _ => None,
        }
    }
}

impl From<ImageSubscription> for RepoSubscription {
    fn from(sub: ImageSubscription) -> Self {
        Self::Image(sub)
    }
}

/// Policy used to pick one image among the tags of a repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionStrategy {
    /// Track the digest of a single pinned tag
    Digest,
    /// Pin a tag; its digest is advisory and may move
    Tag,
    /// Highest semantic version, optionally constrained
    #[default]
    SemVer,
    /// Lexically greatest tag
    Lexical,
    /// Most recently built image
    NewestBuild,
}

impl std::fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Digest => "Digest",
            Self::Tag => "Tag",
            Self::SemVer => "SemVer",
            Self::Lexical => "Lexical",
            Self::NewestBuild => "NewestBuild",
        };
        f.write_str(name)
    }
}

/// Subscription to a container image repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSubscription {
    /// Image repository, e.g. `ghcr.io/org/app`
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default, rename = "imageSelectionStrategy")]
    pub strategy: SelectionStrategy,

    /// Version requirement (SemVer) or pinned tag (Digest, Tag).
    /// Ignored by the other strategies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Name of an explicit credential entry to use instead of URL matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_ref: Option<String>,

    /// Only tags matching this regex are candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_tags: Option<String>,

    /// Tags that are never candidates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_tags: Vec<String>,

    /// Source repository the image is built from
    #[serde(default, rename = "gitRepoURL", skip_serializing_if = "Option::is_none")]
    pub git_repo_url: Option<String>,
}

impl ImageSubscription {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// The constraint, if it has any effect under the current strategy
    pub fn effective_constraint(&self) -> Option<&str> {
        match self.strategy {
            SelectionStrategy::Lexical | SelectionStrategy::NewestBuild => None,
            _ => self
                .constraint
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty()),
        }
    }

    /// Build the tag filter described by `allowTags` / `ignoreTags`
    pub fn tag_filter(&self) -> Result<TagFilter> {
        TagFilter::new(self.allow_tags.as_deref(), &self.ignore_tags)
    }

    /// Check the subscription is usable
    pub fn validate(&self) -> Result<()> {
        if self.repo_url.trim().is_empty() {
            return Err(CoreError::MissingField {
                field: "image.repoURL".to_string(),
            });
        }
        self.tag_filter()?;
        Ok(())
    }
}

/// Allow/ignore filter applied to candidate tags
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    allow: Option<Regex>,
    ignore: Vec<String>,
}

impl TagFilter {
    pub fn new(allow: Option<&str>, ignore: &[String]) -> Result<Self> {
        let allow = allow
            .filter(|p| !p.is_empty())
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| CoreError::InvalidTagPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            allow,
            ignore: ignore.to_vec(),
        })
    }

    pub fn allows(&self, tag: &str) -> bool {
        if self.ignore.iter().any(|t| t == tag) {
            return false;
        }
        self.allow.as_ref().map(|re| re.is_match(tag)).unwrap_or(true)
    }
}

/// Subscription to a Git repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSubscription {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Subscription to a Helm chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSubscription {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semver_constraint: Option<String>,
}
