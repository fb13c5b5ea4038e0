// src/api/client.rs
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, IF_MODIFIED_SINCE, PRAGMA};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::resource::Resource;
use crate::api::source::ResourceFetcher;
use crate::error::{ConfigError, FetchError, FetchResult};
use crate::{log_debug, log_warn};

/// Old enough that any intermediary treats its copy as modified.
pub const IF_MODIFIED_SINCE_SENTINEL: &str = "Mon, 26 Jul 1997 05:00:00 GMT";

/// Whether requests ask intermediaries to skip their caches.
/// The server is free to ignore the headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    #[default]
    NoCache,
    Default,
}

/// Thin GET-and-decode wrapper around the Rackio REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    cache_mode: CacheMode,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        cache_mode: CacheMode,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        reqwest::Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_mode,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache_mode(&self) -> CacheMode {
        self.cache_mode
    }

    pub fn url_for(&self, resource: Resource) -> String {
        format!("{}{}", self.base_url, resource.path())
    }

    fn cache_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.cache_mode == CacheMode::NoCache {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
            headers.insert(
                IF_MODIFIED_SINCE,
                HeaderValue::from_static(IF_MODIFIED_SINCE_SENTINEL),
            );
        }
        headers
    }

    /// Issues exactly one GET for `resource` and decodes the body as JSON.
    pub async fn fetch(&self, resource: Resource) -> FetchResult<serde_json::Value> {
        let url = self.url_for(resource);
        log_debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.cache_headers())
            .send()
            .await
            .map_err(|e| FetchError::failed(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            log_warn!("GET {} returned {}", url, status);
            return Err(FetchError::failed(&url, format!("HTTP {}", status)));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| FetchError::failed(&url, e))
    }
}

#[async_trait]
impl ResourceFetcher for ApiClient {
    async fn fetch(&self, resource: Resource) -> FetchResult<serde_json::Value> {
        ApiClient::fetch(self, resource).await
    }
}
