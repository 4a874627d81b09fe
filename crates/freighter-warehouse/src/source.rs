//! Source URL derivation
//!
//! Maps the Git repository an image is built from, plus the image tag, to a
//! browsable URL of the source at that tag. Unknown hosts yield an empty
//! string.

use std::fmt;

/// Derives a source URL from a canonical base URL and a tag
pub type SourceUrlFn = Box<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Providers known out of the box, in match order
const BUILTIN_PROVIDERS: [(&str, fn(&str, &str) -> String); 4] = [
    ("https://github.com", github_source_url),
    ("https://gitlab.com", gitlab_source_url),
    ("https://bitbucket.org", bitbucket_source_url),
    ("https://codeberg.org", codeberg_source_url),
];

/// Ordered table of URL prefixes and their derivers
///
/// The first registered prefix matching the base URL wins. A prefix only
/// matches on a path boundary, so `https://github.com` does not claim
/// `https://github.company.io`.
pub struct SourceUrlTable {
    entries: Vec<(String, SourceUrlFn)>,
}

impl SourceUrlTable {
    /// An empty table that derives nothing
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A table with the built-in hosting providers
    pub fn builtin() -> Self {
        BUILTIN_PROVIDERS
            .iter()
            .fold(Self::new(), |table, (prefix, derive)| {
                table.register(*prefix, *derive)
            })
    }

    /// Append a provider; earlier registrations take precedence
    pub fn register<F>(mut self, prefix: impl Into<String>, derive: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        let prefix = prefix.into();
        let prefix = canonical_base_url(&prefix).to_string();
        self.entries.push((prefix, Box::new(derive)));
        self
    }

    /// Registered prefixes, in match order
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(prefix, _)| prefix.as_str())
    }

    /// Derive the source URL for a tag, or `""` when no provider matches
    pub fn derive(&self, base_url: &str, tag: &str) -> String {
        let base = canonical_base_url(base_url);
        self.entries
            .iter()
            .find(|(prefix, _)| matches_prefix(base, prefix))
            .map(|(_, derive)| derive(base, tag))
            .unwrap_or_default()
    }
}

impl Default for SourceUrlTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for SourceUrlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUrlTable")
            .field("prefixes", &self.prefixes().collect::<Vec<_>>())
            .finish()
    }
}

/// Strip surrounding whitespace, trailing slashes and a `.git` suffix
pub fn canonical_base_url(url: &str) -> &str {
    let url = url.trim().trim_end_matches('/');
    url.strip_suffix(".git").unwrap_or(url)
}

fn matches_prefix(base: &str, prefix: &str) -> bool {
    match base.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn github_source_url(base: &str, tag: &str) -> String {
    format!("{}/tree/{}", canonical_base_url(base), tag)
}

pub fn gitlab_source_url(base: &str, tag: &str) -> String {
    format!("{}/-/tree/{}", canonical_base_url(base), tag)
}

pub fn bitbucket_source_url(base: &str, tag: &str) -> String {
    format!("{}/src/{}", canonical_base_url(base), tag)
}

pub fn codeberg_source_url(base: &str, tag: &str) -> String {
    format!("{}/src/tag/{}", canonical_base_url(base), tag)
}
