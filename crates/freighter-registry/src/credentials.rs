//! Credential lookup for image, Git and Helm repositories
//!
//! Key properties:
//! - Absence of credentials is an expected outcome (`Ok(None)`), callers
//!   then proceed anonymously
//! - Errors are reserved for stores that are unreachable or malformed
//! - Secrets are resolved fresh on every lookup and zeroed on drop
//! - Optional Docker `config.json` fallback for image registries

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CredentialsError;
use crate::registry::{DOCKER_HUB, registry_host};

type Result<T> = std::result::Result<T, CredentialsError>;

/// Credentials for one repository
///
/// Built per lookup and wiped when dropped; never cached by this crate.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub username: String,
    /// Password or token
    pub password: String,
    pub client_certificate: Option<ClientCertificate>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_certificate: None,
        }
    }

    pub fn with_client_certificate(mut self, cert: ClientCertificate) -> Self {
        self.client_certificate = Some(cert);
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("client_certificate", &self.client_certificate.is_some())
            .finish()
    }
}

/// PEM-encoded client certificate and key
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ClientCertificate {
    pub cert_pem: String,
    pub key_pem: String,
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientCertificate([REDACTED])")
    }
}

/// Which kind of secret to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    Image,
    Git,
    Helm,
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Git => write!(f, "git"),
            Self::Helm => write!(f, "helm"),
        }
    }
}

/// Credential store boundary
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait CredentialsDb: Send + Sync {
    /// Find credentials for a repository URL in a namespace
    ///
    /// Returns `Ok(None)` when nothing matches.
    async fn get(
        &self,
        namespace: &str,
        credential_type: CredentialType,
        repo_url: &str,
    ) -> Result<Option<Credentials>>;

    /// Find credentials by explicit name
    async fn get_by_name(&self, namespace: &str, name: &str) -> Result<Option<Credentials>> {
        let _ = (namespace, name);
        Ok(None)
    }
}

fn ensure_repo_url(repo_url: &str) -> Result<()> {
    if repo_url.trim().is_empty() {
        return Err(CredentialsError::InvalidRequest {
            message: "repository URL must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Normalize a repository URL for comparison
pub fn normalize_url(credential_type: CredentialType, repo_url: &str) -> String {
    let url = repo_url.trim().trim_end_matches('/');
    let url = match credential_type {
        CredentialType::Git => url.strip_suffix(".git").unwrap_or(url),
        CredentialType::Image | CredentialType::Helm => url,
    };
    url.to_ascii_lowercase()
}

// ============ Credential store file ============

/// Contents of a credential store file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsConfig {
    /// Namespaces searched, in order, when the requested one has no match
    #[serde(default)]
    pub global_namespaces: Vec<String>,

    /// Fall back to a Docker config.json for image registries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_config: Option<DockerConfigRef>,

    #[serde(default)]
    pub credentials: Vec<CredentialEntry>,
}

/// Location of a Docker config.json (`~/.docker/config.json` when unset)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockerConfigRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// One stored credential
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(rename = "type")]
    pub credential_type: CredentialType,

    /// Exact repository URL
    #[serde(default, rename = "repoURL", skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    /// Regex matched against the normalized repository URL
    #[serde(default, rename = "repoURLPattern", skip_serializing_if = "Option::is_none")]
    pub repo_url_pattern: Option<String>,

    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable holding the password (CI/CD friendly)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("credential_type", &self.credential_type)
            .field("repo_url", &self.repo_url)
            .field("repo_url_pattern", &self.repo_url_pattern)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl CredentialEntry {
    /// Resolve the entry to actual secret values
    pub fn resolve(&self) -> Result<Credentials> {
        let password = match (&self.password, &self.password_env) {
            (Some(password), _) => password.clone(),
            (None, Some(var)) => std::env::var(var).map_err(|_| {
                CredentialsError::lookup(format!(
                    "environment variable {} for credential '{}' not set",
                    var, self.name
                ))
            })?,
            (None, None) => String::new(),
        };

        let mut credentials = Credentials::new(self.username.clone(), password);
        match (&self.client_cert, &self.client_key) {
            (Some(cert), Some(key)) => {
                credentials = credentials.with_client_certificate(ClientCertificate {
                    cert_pem: cert.clone(),
                    key_pem: key.clone(),
                });
            }
            (None, None) => {}
            _ => {
                return Err(CredentialsError::lookup(format!(
                    "credential '{}' must set both clientCert and clientKey",
                    self.name
                )));
            }
        }

        Ok(credentials)
    }

    fn matches_exact(&self, credential_type: CredentialType, normalized_url: &str) -> bool {
        self.repo_url
            .as_deref()
            .map(|u| normalize_url(credential_type, u) == normalized_url)
            .unwrap_or(false)
    }

    fn matches_pattern(&self, normalized_url: &str) -> Result<bool> {
        let Some(pattern) = &self.repo_url_pattern else {
            return Ok(false);
        };
        let re = Regex::new(pattern).map_err(|e| {
            CredentialsError::lookup(format!(
                "credential '{}' has an invalid repoURLPattern: {}",
                self.name, e
            ))
        })?;
        Ok(re.is_match(normalized_url))
    }
}

impl CredentialsConfig {
    /// Parse a credential store from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Namespaces to search for a request, most specific first
    fn search_order<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a str> {
        std::iter::once(namespace).chain(
            self.global_namespaces
                .iter()
                .map(String::as_str)
                .filter(move |ns| *ns != namespace),
        )
    }

    /// Look up credentials by repository URL
    ///
    /// Exact URL matches win over pattern matches; the requested namespace is
    /// searched before the global namespaces.
    pub fn lookup(
        &self,
        namespace: &str,
        credential_type: CredentialType,
        repo_url: &str,
    ) -> Result<Option<Credentials>> {
        ensure_repo_url(repo_url)?;
        let url = normalize_url(credential_type, repo_url);

        for ns in self.search_order(namespace) {
            if let Some(entry) = self.find(ns, credential_type, &url)? {
                tracing::debug!(
                    "Using credential '{}' from namespace '{}' for {}",
                    entry.name,
                    ns,
                    repo_url
                );
                return entry.resolve().map(Some);
            }
        }

        if credential_type == CredentialType::Image {
            if let Some(docker) = &self.docker_config {
                let config = load_docker_config(docker.path.as_deref())?;
                return config.credentials_for(registry_host(repo_url));
            }
        }

        Ok(None)
    }

    /// Look up credentials by entry name
    pub fn lookup_by_name(&self, namespace: &str, name: &str) -> Result<Option<Credentials>> {
        for ns in self.search_order(namespace) {
            if let Some(entry) = self
                .credentials
                .iter()
                .find(|e| e.namespace == ns && e.name == name)
            {
                return entry.resolve().map(Some);
            }
        }
        Ok(None)
    }

    fn find(
        &self,
        namespace: &str,
        credential_type: CredentialType,
        normalized_url: &str,
    ) -> Result<Option<&CredentialEntry>> {
        let candidates: Vec<&CredentialEntry> = self
            .credentials
            .iter()
            .filter(|e| e.namespace == namespace && e.credential_type == credential_type)
            .collect();

        if let Some(entry) = candidates
            .iter()
            .copied()
            .find(|e| e.matches_exact(credential_type, normalized_url))
        {
            return Ok(Some(entry));
        }

        for entry in candidates {
            if entry.matches_pattern(normalized_url)? {
                return Ok(Some(entry));
            }
        }

        Ok(None)
    }
}

/// Credential store backed by a YAML file
///
/// The file is read on every lookup, so edits take effect without a restart
/// and a vanished or corrupted file surfaces as a lookup error.
#[derive(Debug, Clone)]
pub struct FileCredentialsDb {
    path: PathBuf,
}

impl FileCredentialsDb {
    /// Open a credential store, checking that it parses
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            CredentialsError::lookup(format!("cannot read {}: {}", path.display(), e))
        })?;
        CredentialsConfig::from_yaml(&content)?;
        Ok(Self { path })
    }

    /// Default store location (`<config dir>/freighter/credentials.yaml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("freighter").join("credentials.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<CredentialsConfig> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CredentialsError::lookup(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        CredentialsConfig::from_yaml(&content)
    }
}

#[async_trait]
impl CredentialsDb for FileCredentialsDb {
    async fn get(
        &self,
        namespace: &str,
        credential_type: CredentialType,
        repo_url: &str,
    ) -> Result<Option<Credentials>> {
        ensure_repo_url(repo_url)?;
        self.load().await?.lookup(namespace, credential_type, repo_url)
    }

    async fn get_by_name(&self, namespace: &str, name: &str) -> Result<Option<Credentials>> {
        self.load().await?.lookup_by_name(namespace, name)
    }
}

/// Store that never has credentials; every repository is accessed anonymously
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousCredentialsDb;

#[async_trait]
impl CredentialsDb for AnonymousCredentialsDb {
    async fn get(
        &self,
        _namespace: &str,
        _credential_type: CredentialType,
        repo_url: &str,
    ) -> Result<Option<Credentials>> {
        ensure_repo_url(repo_url)?;
        Ok(None)
    }
}

/// Function signature backing [`FakeCredentialsDb`]
pub type GetCredentialsFn =
    Box<dyn Fn(&str, CredentialType, &str) -> Result<Option<Credentials>> + Send + Sync>;

/// Closure-backed credential store for tests
pub struct FakeCredentialsDb {
    get_fn: GetCredentialsFn,
}

impl FakeCredentialsDb {
    pub fn new<F>(get_fn: F) -> Self
    where
        F: Fn(&str, CredentialType, &str) -> Result<Option<Credentials>> + Send + Sync + 'static,
    {
        Self {
            get_fn: Box::new(get_fn),
        }
    }

    /// A store that finds nothing
    pub fn not_found() -> Self {
        Self::new(|_, _, _| Ok(None))
    }
}

#[async_trait]
impl CredentialsDb for FakeCredentialsDb {
    async fn get(
        &self,
        namespace: &str,
        credential_type: CredentialType,
        repo_url: &str,
    ) -> Result<Option<Credentials>> {
        (self.get_fn)(namespace, credential_type, repo_url)
    }
}

// ============ Docker config fallback ============

/// Docker config.json format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    pub auths: HashMap<String, DockerAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerAuth {
    #[serde(default)]
    pub auth: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl DockerConfig {
    /// Credentials for a registry host, if configured
    pub fn credentials_for(&self, host: &str) -> Result<Option<Credentials>> {
        let mut candidates = vec![
            host.to_string(),
            format!("https://{}", host),
            format!("http://{}", host),
        ];
        if host == DOCKER_HUB {
            candidates.push("https://index.docker.io/v1/".to_string());
            candidates.push("index.docker.io".to_string());
            candidates.push("registry-1.docker.io".to_string());
        }

        for candidate in &candidates {
            let Some(auth) = self.auths.get(candidate) else {
                continue;
            };
            if let Some(encoded) = &auth.auth {
                return decode_docker_auth(candidate, encoded).map(Some);
            }
            if let (Some(u), Some(p)) = (&auth.username, &auth.password) {
                return Ok(Some(Credentials::new(u.clone(), p.clone())));
            }
        }
        Ok(None)
    }
}

fn decode_docker_auth(key: &str, encoded: &str) -> Result<Credentials> {
    let malformed = || CredentialsError::lookup(format!("malformed auth for '{}' in docker config", key));

    let decoded =
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded.trim())
            .map_err(|_| malformed())?;
    let decoded = String::from_utf8(decoded).map_err(|_| malformed())?;
    let (user, pass) = decoded.split_once(':').ok_or_else(malformed)?;
    Ok(Credentials::new(user, pass))
}

/// Load Docker config from default or specified path
fn load_docker_config(path: Option<&Path>) -> Result<DockerConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let home = dirs::home_dir()
                .ok_or_else(|| CredentialsError::lookup("could not determine home directory"))?;
            home.join(".docker").join("config.json")
        }
    };

    if !config_path.exists() {
        return Ok(DockerConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;
    let config: DockerConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const STORE: &str = r#"
globalNamespaces: [shared]
credentials:
  - name: api-exact
    namespace: team-a
    type: image
    repoURL: ghcr.io/acme/api
    username: exact
    password: s3cret
  - name: acme-pattern
    namespace: team-a
    type: image
    repoURLPattern: "^ghcr\\.io/acme/"
    username: pattern
    password: p4ss
  - name: shared-hub
    namespace: shared
    type: image
    repoURL: docker.io/library/nginx
    username: hub
    password: hubpass
  - name: git-repo
    namespace: team-a
    type: git
    repoURL: https://github.com/acme/api
    username: git
    password: token
"#;

    fn store() -> CredentialsConfig {
        CredentialsConfig::from_yaml(STORE).unwrap()
    }

    #[test]
    fn test_exact_match_beats_pattern() {
        let creds = store()
            .lookup("team-a", CredentialType::Image, "ghcr.io/acme/api")
            .unwrap()
            .unwrap();
        assert_eq!(creds.username, "exact");
        assert_eq!(creds.password, "s3cret");
    }

    #[test]
    fn test_pattern_match() {
        let creds = store()
            .lookup("team-a", CredentialType::Image, "ghcr.io/acme/web")
            .unwrap()
            .unwrap();
        assert_eq!(creds.username, "pattern");
    }

    #[test]
    fn test_url_normalization() {
        let creds = store()
            .lookup("team-a", CredentialType::Image, "GHCR.io/acme/api/")
            .unwrap()
            .unwrap();
        assert_eq!(creds.username, "exact");

        let git = store()
            .lookup("team-a", CredentialType::Git, "https://github.com/acme/api.git")
            .unwrap()
            .unwrap();
        assert_eq!(git.username, "git");
    }

    #[test]
    fn test_global_namespace_fallback() {
        let creds = store()
            .lookup("team-b", CredentialType::Image, "docker.io/library/nginx")
            .unwrap()
            .unwrap();
        assert_eq!(creds.username, "hub");
    }

    #[test]
    fn test_not_found_is_not_an_error() {
        let result = store()
            .lookup("team-b", CredentialType::Image, "quay.io/other/thing")
            .unwrap();
        assert!(result.is_none());

        // Same URL, wrong type
        let result = store()
            .lookup("team-a", CredentialType::Helm, "ghcr.io/acme/api")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_repo_url_rejected() {
        let err = store()
            .lookup("team-a", CredentialType::Image, "  ")
            .unwrap_err();
        assert!(matches!(err, CredentialsError::InvalidRequest { .. }));
    }

    #[test]
    fn test_lookup_by_name() {
        let creds = store().lookup_by_name("team-b", "shared-hub").unwrap().unwrap();
        assert_eq!(creds.username, "hub");
        assert!(store().lookup_by_name("team-a", "missing").unwrap().is_none());
    }

    #[test]
    fn test_password_from_env() {
        let yaml = r#"
credentials:
  - name: ci
    type: image
    repoURL: ghcr.io/acme/ci
    username: ci
    passwordEnv: FREIGHTER_TEST_CI_TOKEN
"#;
        let config = CredentialsConfig::from_yaml(yaml).unwrap();

        // SAFETY: Test runs in single thread, no concurrent access to env vars
        unsafe { std::env::set_var("FREIGHTER_TEST_CI_TOKEN", "from-env") };
        let creds = config
            .lookup("default", CredentialType::Image, "ghcr.io/acme/ci")
            .unwrap()
            .unwrap();
        assert_eq!(creds.password, "from-env");

        // SAFETY: Test runs in single thread, no concurrent access to env vars
        unsafe { std::env::remove_var("FREIGHTER_TEST_CI_TOKEN") };
        let err = config
            .lookup("default", CredentialType::Image, "ghcr.io/acme/ci")
            .unwrap_err();
        assert!(matches!(err, CredentialsError::Lookup { .. }));
    }

    #[test]
    fn test_invalid_pattern_is_lookup_error() {
        let yaml = r#"
credentials:
  - name: broken
    type: image
    repoURLPattern: "("
"#;
        let config = CredentialsConfig::from_yaml(yaml).unwrap();
        let err = config
            .lookup("default", CredentialType::Image, "ghcr.io/x/y")
            .unwrap_err();
        assert!(matches!(err, CredentialsError::Lookup { .. }));
    }

    #[test]
    fn test_client_certificate() {
        let yaml = r#"
credentials:
  - name: mtls
    type: helm
    repoURL: https://charts.example.com
    username: u
    password: p
    clientCert: CERT
    clientKey: KEY
"#;
        let config = CredentialsConfig::from_yaml(yaml).unwrap();
        let creds = config
            .lookup("default", CredentialType::Helm, "https://charts.example.com")
            .unwrap()
            .unwrap();
        let cert = creds.client_certificate.as_ref().unwrap();
        assert_eq!(cert.cert_pem, "CERT");
        assert_eq!(cert.key_pem, "KEY");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("user", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_docker_config_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let docker_path = dir.path().join("config.json");
        // "robot:token"
        std::fs::write(
            &docker_path,
            r#"{"auths": {"registry.example.com": {"auth": "cm9ib3Q6dG9rZW4="}}}"#,
        )
        .unwrap();

        let config = CredentialsConfig {
            docker_config: Some(DockerConfigRef {
                path: Some(docker_path),
            }),
            ..Default::default()
        };

        let creds = config
            .lookup("default", CredentialType::Image, "registry.example.com/team/app")
            .unwrap()
            .unwrap();
        assert_eq!(creds.username, "robot");
        assert_eq!(creds.password, "token");

        assert!(config
            .lookup("default", CredentialType::Image, "quay.io/team/app")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_docker_hub_auth_key() {
        let mut config = DockerConfig::default();
        config.auths.insert(
            "https://index.docker.io/v1/".to_string(),
            DockerAuth {
                auth: None,
                username: Some("hubuser".to_string()),
                password: Some("hubpass".to_string()),
            },
        );

        let creds = config.credentials_for(DOCKER_HUB).unwrap().unwrap();
        assert_eq!(creds.username, "hubuser");
    }

    #[tokio::test]
    async fn test_file_credentials_db() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(STORE.as_bytes()).unwrap();

        let db = FileCredentialsDb::open(file.path()).unwrap();
        let creds = db
            .get("team-a", CredentialType::Image, "ghcr.io/acme/api")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.username, "exact");

        let by_name = db.get_by_name("team-a", "acme-pattern").await.unwrap().unwrap();
        assert_eq!(by_name.username, "pattern");
    }

    #[tokio::test]
    async fn test_file_credentials_db_store_vanished() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.yaml");
        std::fs::write(&path, STORE).unwrap();

        let db = FileCredentialsDb::open(&path).unwrap();
        std::fs::write(&path, "credentials: [unterminated").unwrap();

        let err = db
            .get("team-a", CredentialType::Image, "ghcr.io/acme/api")
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialsError::Lookup { .. }));
    }

    #[test]
    fn test_file_credentials_db_open_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileCredentialsDb::open(dir.path().join("missing.yaml")).is_err());
    }

    #[tokio::test]
    async fn test_anonymous_and_fake_db() {
        let anonymous = AnonymousCredentialsDb;
        assert!(anonymous
            .get("ns", CredentialType::Image, "nginx")
            .await
            .unwrap()
            .is_none());

        let fake = FakeCredentialsDb::new(|ns, ty, url| {
            assert_eq!(ns, "ns");
            assert_eq!(ty, CredentialType::Image);
            Ok(Some(Credentials::new(url, "pw")))
        });
        let creds = fake
            .get("ns", CredentialType::Image, "nginx")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.username, "nginx");
        assert!(fake.get_by_name("ns", "anything").await.unwrap().is_none());
    }
}
