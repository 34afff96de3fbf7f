use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use volley_core::{FetchError, FetchId, Item};

use crate::fetcher::Fetcher;

#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    pub base_url: Url,
    /// Collection path under the base URL; per-item requests append `/{id}`.
    pub collection_path: String,
    pub timeout: Duration,
    pub max_response_bytes: usize,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://jsonplaceholder.typicode.com").unwrap_or_else(|e| {
                panic!("default base url is invalid: {e}. This is a bug - please report it.");
            }),
            collection_path: "/posts".to_string(),
            timeout: Duration::from_secs(30),
            max_response_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Reqwest-backed `Fetcher` issuing GETs against a JSON collection endpoint.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: HttpFetcherConfig,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("volley-exec/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Permanent(format!("failed to build http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn collection_url(&self) -> Result<Url, FetchError> {
        self.config
            .base_url
            .join(&self.config.collection_path)
            .map_err(|e| FetchError::Permanent(format!("invalid collection url: {e}")))
    }

    fn item_url(&self, id: &FetchId) -> Result<Url, FetchError> {
        let path = format!(
            "{}/{}",
            self.config.collection_path.trim_end_matches('/'),
            id
        );
        self.config
            .base_url
            .join(&path)
            .map_err(|e| FetchError::Permanent(format!("invalid item url for {id}: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();

        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        if body.len() > self.config.max_response_bytes {
            return Err(FetchError::Permanent(format!(
                "response too large (>{} bytes)",
                self.config.max_response_bytes
            )));
        }

        if !(200..300).contains(&status) {
            return Err(classify_status(
                status,
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::Permanent(format!("malformed response body: {e}")))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, id: &FetchId) -> Result<Item, FetchError> {
        let url = self.item_url(id)?;
        self.get_json(url).await
    }

    async fn fetch_all(&self) -> Result<Vec<Item>, FetchError> {
        let url = self.collection_url()?;
        self.get_json(url).await
    }
}

/// Map a non-2xx status to the error taxonomy. The response body travels as
/// the error message.
fn classify_status(status: u16, body: String) -> FetchError {
    let message = format!("http {status}: {body}");
    if status >= 500 || status == 408 || status == 429 {
        FetchError::Transient(message)
    } else {
        FetchError::Permanent(message)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        return FetchError::Transient("timeout".to_string());
    }
    if e.is_connect() || e.is_request() {
        return FetchError::Transient(format!("connect/dns/tls error: {e}"));
    }
    FetchError::Permanent(e.to_string())
}
