use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Why a JSON resource could not be loaded. Cloneable so every caller
/// waiting on the same request receives it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("failed to load {url}: {status}")]
    Status { url: String, status: u16 },
    #[error("request for {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("invalid data in {url}: {message}")]
    Decode { url: String, message: String },
}

impl LoadError {
    pub fn url(&self) -> &str {
        match self {
            LoadError::Status { url, .. }
            | LoadError::Transport { url, .. }
            | LoadError::Decode { url, .. } => url,
        }
    }
}

/// Issues a single uncached request and parses the body as JSON.
pub trait Transport {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, LoadError>>;
}

/// A request that may still be in flight. Clones resolve to the same result.
pub type PendingJson = Shared<LocalBoxFuture<'static, Result<Rc<Value>, LoadError>>>;

/// Get-or-fetch cache keyed by the exact URL string. Entries are never
/// evicted or retried; a failed request stays failed for the page lifetime.
pub struct DataLoader<T> {
    transport: Rc<T>,
    cache: RefCell<HashMap<String, PendingJson>>,
}

impl<T: Transport + 'static> DataLoader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Rc::new(transport),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Return the cached request for `url`, or start one. The entry is stored
    /// before the request settles so concurrent callers share it.
    pub fn get(&self, url: &str) -> PendingJson {
        if let Some(pending) = self.cache.borrow().get(url) {
            debug!("loader: reusing request for {url}");
            return pending.clone();
        }

        let transport = Rc::clone(&self.transport);
        let target = url.to_owned();
        let pending = async move { transport.fetch(&target).await.map(Rc::new) }
            .boxed_local()
            .shared();
        self.cache
            .borrow_mut()
            .insert(url.to_owned(), pending.clone());
        pending
    }

    /// Fetch `url` and decode it into `D`.
    pub async fn get_as<D: DeserializeOwned>(&self, url: &str) -> Result<D, LoadError> {
        let value = self.get(url).await?;
        D::deserialize(value.as_ref()).map_err(|e| LoadError::Decode {
            url: url.to_owned(),
            message: e.to_string(),
        })
    }
}

/// Browser `fetch` through reqwest. Relative paths resolve against the
/// document base URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base: Option<Url>,
}

impl HttpTransport {
    pub fn new(base: Option<&str>) -> Self {
        let client = Client::builder().build().unwrap_or_else(|err| {
            warn!("network client: falling back to default HTTP client configuration ({err})");
            Client::new()
        });
        let base = base.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!("network client: ignoring invalid base URL {raw:?} ({err})");
                None
            }
        });
        Self { client, base }
    }

    fn resolve(&self, path: &str) -> Result<Url, LoadError> {
        let joined = match &self.base {
            Some(base) => base.join(path),
            None => Url::parse(path),
        };
        joined.map_err(|e| LoadError::Transport {
            url: path.to_owned(),
            message: format!("invalid URL: {e}"),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, LoadError>> {
        let client = self.client.clone();
        let resolved = self.resolve(url);
        let url = url.to_owned();
        async move {
            let target = resolved?;
            let response = client
                .get(target)
                .header(CACHE_CONTROL, "no-store")
                .header(PRAGMA, "no-cache")
                .send()
                .await
                .map_err(|e| LoadError::Transport {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| LoadError::Decode {
                    url,
                    message: e.to_string(),
                })
        }
        .boxed_local()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    use futures_util::future;
    use serde::Deserialize;
    use serde_json::json;

    /// Canned responses; counts how many requests actually went out.
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        responses: HashMap<String, Result<Value, LoadError>>,
        pub(crate) calls: Rc<Cell<usize>>,
    }

    impl FakeTransport {
        pub(crate) fn with(mut self, url: &str, body: Value) -> Self {
            self.responses.insert(url.to_owned(), Ok(body));
            self
        }

        pub(crate) fn failing(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(
                url.to_owned(),
                Err(LoadError::Status {
                    url: url.to_owned(),
                    status,
                }),
            );
            self
        }
    }

    impl Transport for FakeTransport {
        fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, LoadError>> {
            self.calls.set(self.calls.get() + 1);
            let result = self.responses.get(url).cloned().unwrap_or_else(|| {
                Err(LoadError::Status {
                    url: url.to_owned(),
                    status: 404,
                })
            });
            future::ready(result).boxed_local()
        }
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let transport = FakeTransport::default().with("./data/apps.json", json!({"order": []}));
        let calls = Rc::clone(&transport.calls);
        let loader = DataLoader::new(transport);

        let (a, b) = future::join(loader.get("./data/apps.json"), loader.get("./data/apps.json")).await;
        assert_eq!(calls.get(), 1);
        assert_eq!(a.unwrap(), b.unwrap());

        loader.get("./data/apps.json").await.unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn different_urls_are_cached_separately() {
        let transport = FakeTransport::default()
            .with("a.json", json!(1))
            .with("b.json", json!(2));
        let calls = Rc::clone(&transport.calls);
        let loader = DataLoader::new(transport);

        assert_eq!(*loader.get("a.json").await.unwrap(), json!(1));
        assert_eq!(*loader.get("b.json").await.unwrap(), json!(2));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn failed_status_carries_url_and_code_and_is_not_retried() {
        let transport = FakeTransport::default().failing("./data/i18n.json", 503);
        let calls = Rc::clone(&transport.calls);
        let loader = DataLoader::new(transport);

        let err = loader.get("./data/i18n.json").await.unwrap_err();
        assert_eq!(err.url(), "./data/i18n.json");
        assert_eq!(err.to_string(), "failed to load ./data/i18n.json: 503");

        assert!(loader.get("./data/i18n.json").await.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn typed_decode_reports_shape_errors() {
        #[derive(Debug, Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            order: Vec<String>,
        }

        let transport = FakeTransport::default()
            .with("ok.json", json!({"order": ["a"]}))
            .with("bad.json", json!({"order": 7}));
        let loader = DataLoader::new(transport);

        assert!(loader.get_as::<Shape>("ok.json").await.is_ok());
        let err = loader.get_as::<Shape>("bad.json").await.unwrap_err();
        assert!(matches!(err, LoadError::Decode { ref url, .. } if url == "bad.json"));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let http = HttpTransport::new(Some("https://sashkinbro.github.io/app.html?id=notes"));
        assert_eq!(
            http.resolve("./data/apps.json").unwrap().as_str(),
            "https://sashkinbro.github.io/data/apps.json"
        );
        assert_eq!(
            http.resolve("https://cdn.test/x.json").unwrap().as_str(),
            "https://cdn.test/x.json"
        );

        let bare = HttpTransport::new(None);
        assert!(matches!(
            bare.resolve("./data/apps.json"),
            Err(LoadError::Transport { .. })
        ));
    }
}
