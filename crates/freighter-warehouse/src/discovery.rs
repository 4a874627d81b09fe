//! Image discovery for warehouses
//!
//! Resolves every image subscription of a warehouse to a concrete image in
//! one sequential pass. Either all subscriptions resolve or the pass fails
//! with the first error; a partial list is never returned.

use freighter_core::{Freight, Image, ImageSubscription, RepoSubscription, Warehouse};
use freighter_registry::{CredentialType, Credentials, CredentialsDb, ImageSelector};
use std::sync::Arc;

use crate::error::{DiscoveryError, Result};
use crate::source::SourceUrlTable;

/// Resolves image subscriptions to images
pub struct ImageDiscoverer {
    credentials: Arc<dyn CredentialsDb>,
    selector: Arc<dyn ImageSelector>,
    source_urls: SourceUrlTable,
}

impl ImageDiscoverer {
    pub fn new(credentials: Arc<dyn CredentialsDb>, selector: Arc<dyn ImageSelector>) -> Self {
        Self {
            credentials,
            selector,
            source_urls: SourceUrlTable::builtin(),
        }
    }

    /// Replace the source URL provider table
    pub fn with_source_urls(mut self, source_urls: SourceUrlTable) -> Self {
        self.source_urls = source_urls;
        self
    }

    /// Select the latest suitable image for each image subscription
    ///
    /// Non-image subscriptions are skipped. Output order follows input order.
    pub async fn select_images(
        &self,
        namespace: &str,
        subscriptions: &[RepoSubscription],
    ) -> Result<Vec<Image>> {
        let mut images = Vec::new();

        for subscription in subscriptions.iter().filter_map(RepoSubscription::as_image) {
            let repo_url = subscription.repo_url.as_str();
            tracing::debug!("Discovering image for {} in namespace {}", repo_url, namespace);

            let credentials = self
                .lookup_credentials(namespace, subscription)
                .await
                .map_err(|source| DiscoveryError::Credentials {
                    repo_url: repo_url.to_string(),
                    source,
                })?;
            if credentials.is_none() {
                tracing::debug!("No credentials for {}, continuing anonymously", repo_url);
            }

            let selected = self
                .selector
                .select(subscription, credentials.as_ref())
                .await
                .map_err(|source| DiscoveryError::ImageSelection {
                    repo_url: repo_url.to_string(),
                    source,
                })?;

            tracing::debug!(
                "Found {}:{} ({})",
                repo_url,
                selected.tag,
                selected.digest
            );
            images.push(Image::new(repo_url, selected.tag, selected.digest));
        }

        Ok(images)
    }

    /// Run one discovery pass over a warehouse and bundle the result
    pub async fn discover_freight(&self, warehouse: &Warehouse) -> Result<Freight> {
        warehouse.validate()?;

        let images = self
            .select_images(&warehouse.namespace, &warehouse.subscriptions)
            .await?;
        let freight = Freight::new(&warehouse.name, images);

        tracing::debug!(
            "Warehouse {} produced freight {} with {} image(s)",
            warehouse.name,
            freight.id,
            freight.images.len()
        );
        Ok(freight)
    }

    /// Browsable source URL of a repository at a tag, or `""` if unknown
    pub fn image_source_url(&self, base_url: &str, tag: &str) -> String {
        self.source_urls.derive(base_url, tag)
    }

    async fn lookup_credentials(
        &self,
        namespace: &str,
        subscription: &ImageSubscription,
    ) -> std::result::Result<Option<Credentials>, freighter_registry::CredentialsError> {
        match subscription.credential_ref.as_deref() {
            Some(name) => self.credentials.get_by_name(namespace, name).await,
            None => {
                self.credentials
                    .get(namespace, CredentialType::Image, &subscription.repo_url)
                    .await
            }
        }
    }
}

impl std::fmt::Debug for ImageDiscoverer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDiscoverer")
            .field("source_urls", &self.source_urls)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use freighter_core::{GitSubscription, SelectionStrategy};
    use freighter_registry::{
        CredentialsError, FakeCredentialsDb, MockRegistry, RegistryError, RegistrySelector,
        SelectedImage,
    };
    use std::sync::Mutex;
    use std::time::Duration;

    type SelectFn = Box<
        dyn Fn(&ImageSubscription, Option<&Credentials>) -> freighter_registry::Result<SelectedImage>
            + Send
            + Sync,
    >;

    /// Closure-backed selector that records the credentials it was given
    struct FakeSelector {
        select_fn: SelectFn,
        seen_usernames: Mutex<Vec<Option<String>>>,
    }

    impl FakeSelector {
        fn new<F>(select_fn: F) -> Arc<Self>
        where
            F: Fn(&ImageSubscription, Option<&Credentials>) -> freighter_registry::Result<SelectedImage>
                + Send
                + Sync
                + 'static,
        {
            Arc::new(Self {
                select_fn: Box::new(select_fn),
                seen_usernames: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ImageSelector for FakeSelector {
        async fn select(
            &self,
            subscription: &ImageSubscription,
            credentials: Option<&Credentials>,
        ) -> freighter_registry::Result<SelectedImage> {
            self.seen_usernames
                .lock()
                .unwrap()
                .push(credentials.map(|c| c.username.clone()));
            (self.select_fn)(subscription, credentials)
        }
    }

    /// Credential store that only answers lookups by name
    struct NamedCredentialsDb;

    #[async_trait]
    impl CredentialsDb for NamedCredentialsDb {
        async fn get(
            &self,
            _namespace: &str,
            _credential_type: CredentialType,
            _repo_url: &str,
        ) -> std::result::Result<Option<Credentials>, CredentialsError> {
            Err(CredentialsError::lookup("URL lookup should not be used"))
        }

        async fn get_by_name(
            &self,
            namespace: &str,
            name: &str,
        ) -> std::result::Result<Option<Credentials>, CredentialsError> {
            Ok(Some(Credentials::new(format!("{}/{}", namespace, name), "secret")))
        }
    }

    fn image_sub(repo_url: &str) -> RepoSubscription {
        ImageSubscription::new(repo_url).into()
    }

    fn discoverer(selector: Arc<dyn ImageSelector>) -> ImageDiscoverer {
        ImageDiscoverer::new(Arc::new(FakeCredentialsDb::not_found()), selector)
    }

    #[tokio::test]
    async fn test_select_images() {
        let selector = FakeSelector::new(|_, _| Ok(SelectedImage::new("fake-tag", "fake-digest")));
        let images = discoverer(selector)
            .select_images("fake-namespace", &[image_sub("fake-url")])
            .await
            .unwrap();

        assert_eq!(images, vec![Image::new("fake-url", "fake-tag", "fake-digest")]);
    }

    #[tokio::test]
    async fn test_select_images_selector_error() {
        let selector =
            FakeSelector::new(|_, _| Err(RegistryError::Other("something went wrong".to_string())));
        let err = discoverer(selector)
            .select_images("fake-namespace", &[image_sub("fake-url")])
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("error getting latest suitable image"));
        assert!(message.contains("something went wrong"));
        insta::assert_snapshot!(message, @"error getting latest suitable image for repository `fake-url`: something went wrong");
        assert_eq!(err.repo_url(), Some("fake-url"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_select_images_credentials_error_aborts() {
        let credentials = FakeCredentialsDb::new(|_, _, url| {
            if url == "second" {
                Err(CredentialsError::lookup("store offline"))
            } else {
                Ok(None)
            }
        });
        let selector = FakeSelector::new(|_, _| Ok(SelectedImage::new("t", "d")));
        let discoverer = ImageDiscoverer::new(Arc::new(credentials), selector.clone());

        let err = discoverer
            .select_images(
                "ns",
                &[image_sub("first"), image_sub("second"), image_sub("third")],
            )
            .await
            .unwrap_err();

        insta::assert_snapshot!(err.to_string(), @"error obtaining credentials for image repository `second`: credential store lookup failed: store offline");
        assert!(!err.is_transient());
        // The third subscription is never reached
        assert_eq!(selector.seen_usernames.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_select_images_preserves_order_and_skips_non_images() {
        let selector = FakeSelector::new(|sub, _| {
            Ok(SelectedImage::new(
                format!("{}-tag", sub.repo_url),
                format!("{}-digest", sub.repo_url),
            ))
        });
        let subscriptions = vec![
            image_sub("b"),
            RepoSubscription::Git(GitSubscription {
                repo_url: "https://github.com/acme/api.git".to_string(),
                branch: None,
            }),
            image_sub("a"),
        ];

        let images = discoverer(selector)
            .select_images("ns", &subscriptions)
            .await
            .unwrap();

        let repos: Vec<&str> = images.iter().map(|i| i.repo_url.as_str()).collect();
        assert_eq!(repos, vec!["b", "a"]);
        assert_eq!(images[1].tag, "a-tag");
    }

    #[tokio::test]
    async fn test_select_images_empty() {
        let selector = FakeSelector::new(|_, _| Ok(SelectedImage::new("t", "d")));
        let images = discoverer(selector).select_images("ns", &[]).await.unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_credentials_passed_to_selector() {
        let credentials = FakeCredentialsDb::new(|ns, ty, url| {
            assert_eq!(ty, CredentialType::Image);
            Ok((url == "private").then(|| Credentials::new(format!("{}-robot", ns), "token")))
        });
        let selector = FakeSelector::new(|_, _| Ok(SelectedImage::new("t", "d")));
        let discoverer = ImageDiscoverer::new(Arc::new(credentials), selector.clone());

        discoverer
            .select_images("team", &[image_sub("public"), image_sub("private")])
            .await
            .unwrap();

        let seen = selector.seen_usernames.lock().unwrap().clone();
        assert_eq!(seen, vec![None, Some("team-robot".to_string())]);
    }

    #[tokio::test]
    async fn test_credential_ref_uses_named_lookup() {
        let selector = FakeSelector::new(|_, _| Ok(SelectedImage::new("t", "d")));
        let discoverer = ImageDiscoverer::new(Arc::new(NamedCredentialsDb), selector.clone());

        let mut sub = ImageSubscription::new("ghcr.io/acme/api");
        sub.credential_ref = Some("ghcr-robot".to_string());

        discoverer
            .select_images("team", &[sub.into()])
            .await
            .unwrap();

        let seen = selector.seen_usernames.lock().unwrap().clone();
        assert_eq!(seen, vec![Some("team/ghcr-robot".to_string())]);
    }

    #[tokio::test]
    async fn test_discover_freight_with_registry() {
        let registry = MockRegistry::new()
            .with_image("ghcr.io/acme/api", "v1.0.0", "sha256:api1")
            .with_image("ghcr.io/acme/api", "v1.1.0", "sha256:api2")
            .with_image("ghcr.io/acme/web", "2024-05-01", "sha256:web1")
            .with_image("ghcr.io/acme/web", "2024-06-01", "sha256:web2");
        let selector = Arc::new(RegistrySelector::new(Arc::new(registry)));

        let warehouse = Warehouse::new(
            "acme",
            vec![
                image_sub("ghcr.io/acme/api"),
                ImageSubscription::new("ghcr.io/acme/web")
                    .with_strategy(SelectionStrategy::Lexical)
                    .into(),
            ],
        );

        let freight = discoverer(selector).discover_freight(&warehouse).await.unwrap();
        assert_eq!(freight.warehouse, "acme");
        assert_eq!(
            freight.images,
            vec![
                Image::new("ghcr.io/acme/api", "v1.1.0", "sha256:api2"),
                Image::new("ghcr.io/acme/web", "2024-06-01", "sha256:web2"),
            ]
        );
        assert_eq!(freight.id, freighter_core::freight_id(&freight.images));
    }

    #[tokio::test]
    async fn test_discover_freight_invalid_warehouse() {
        let selector = FakeSelector::new(|_, _| Ok(SelectedImage::new("t", "d")));
        let warehouse = Warehouse::new("broken", vec![image_sub("")]);

        let err = discoverer(selector.clone())
            .discover_freight(&warehouse)
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidWarehouse(_)));
        assert!(selector.seen_usernames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_transient() {
        let registry = MockRegistry::new().with_image("ghcr.io/acme/api", "v1.0.0", "sha256:1");
        registry.set_unreachable("ghcr.io/acme/api");
        let selector = Arc::new(RegistrySelector::new(Arc::new(registry)));

        let err = discoverer(selector)
            .select_images("ns", &[image_sub("ghcr.io/acme/api")])
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    /// Selector that never completes
    struct PendingSelector;

    #[async_trait]
    impl ImageSelector for PendingSelector {
        async fn select(
            &self,
            _subscription: &ImageSubscription,
            _credentials: Option<&Credentials>,
        ) -> freighter_registry::Result<SelectedImage> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_select_images_cancelled_by_timeout() {
        let discoverer = discoverer(Arc::new(PendingSelector));
        let subscriptions = [image_sub("ghcr.io/acme/api")];

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            discoverer.select_images("ns", &subscriptions),
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_image_source_url() {
        let selector = FakeSelector::new(|_, _| Ok(SelectedImage::new("t", "d")));
        let discoverer = discoverer(selector);

        assert_eq!(
            discoverer.image_source_url("https://github.com/org/repo.git", "fake-tag"),
            "https://github.com/org/repo/tree/fake-tag"
        );
        assert_eq!(
            discoverer.image_source_url("https://github.com/org/repo", "fake-tag"),
            "https://github.com/org/repo/tree/fake-tag"
        );

        let custom = discoverer.with_source_urls(
            SourceUrlTable::new().register("fake-url-prefix", |_, _| "fake-url".to_string()),
        );
        assert_eq!(custom.image_source_url("fake-url-prefix", "fake-tag"), "fake-url");
        assert_eq!(
            custom.image_source_url("https://github.com/org/repo", "fake-tag"),
            ""
        );
    }
}
