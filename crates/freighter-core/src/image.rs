//! Discovered image references

use serde::{Deserialize, Serialize};
use std::fmt;

/// An image selected from a repository
///
/// The digest identifies the content; the tag is whatever pointed at it when
/// it was discovered and may since have moved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "repoURL")]
    pub repo_url: String,
    pub tag: String,
    pub digest: String,
}

impl Image {
    pub fn new(
        repo_url: impl Into<String>,
        tag: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            tag: tag.into(),
            digest: digest.into(),
        }
    }

    /// Fully qualified, content-addressed reference (`repo:tag@digest`)
    pub fn reference(&self) -> String {
        if self.digest.is_empty() {
            format!("{}:{}", self.repo_url, self.tag)
        } else {
            format!("{}:{}@{}", self.repo_url, self.tag, self.digest)
        }
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}
