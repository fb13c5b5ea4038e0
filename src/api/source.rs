// src/api/source.rs
//! The two ways a view can get at a resource: a fresh request per call, or
//! one request made up front whose result is handed to every caller.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::api::resource::Resource;
use crate::error::{FetchError, FetchResult};
use crate::log_debug;

/// Anything that can perform a single GET for a resource.
#[async_trait]
pub trait ResourceFetcher: Send + Sync + Debug {
    async fn fetch(&self, resource: Resource) -> FetchResult<serde_json::Value>;
}

/// What a poller asks for on every tick.
#[async_trait]
pub trait SnapshotSource: Send + Sync + Debug {
    fn resource(&self) -> Resource;
    async fn latest(&self) -> FetchResult<serde_json::Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Every call issues a new request.
    #[default]
    OnDemand,
    /// One request at construction, shared by every caller afterwards.
    EagerSingleton,
}

pub fn build_source(
    mode: FetchMode,
    fetcher: Arc<dyn ResourceFetcher>,
    resource: Resource,
) -> Arc<dyn SnapshotSource> {
    match mode {
        FetchMode::OnDemand => Arc::new(OnDemandSource::new(fetcher, resource)),
        FetchMode::EagerSingleton => Arc::new(EagerSource::spawn(fetcher, resource)),
    }
}

#[derive(Debug, Clone)]
pub struct OnDemandSource {
    fetcher: Arc<dyn ResourceFetcher>,
    resource: Resource,
}

impl OnDemandSource {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, resource: Resource) -> Self {
        Self { fetcher, resource }
    }
}

#[async_trait]
impl SnapshotSource for OnDemandSource {
    fn resource(&self) -> Resource {
        self.resource
    }

    async fn latest(&self) -> FetchResult<serde_json::Value> {
        self.fetcher.fetch(self.resource).await
    }
}

/// Holds the single pending request made when the source was created.
/// Once it resolves, every caller gets a clone of that result, even if the
/// server has moved on since.
#[derive(Clone)]
pub struct EagerSource {
    resource: Resource,
    pending: Shared<BoxFuture<'static, FetchResult<serde_json::Value>>>,
}

impl EagerSource {
    /// Must be called inside a tokio runtime: the request starts right away.
    pub fn spawn(fetcher: Arc<dyn ResourceFetcher>, resource: Resource) -> Self {
        log_debug!("Issuing eager request for {}", resource.path());
        let task = tokio::spawn(async move { fetcher.fetch(resource).await });

        let pending = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(FetchError::failed(
                    resource.path(),
                    format!("request task ended early: {}", e),
                )),
            }
        }
        .boxed()
        .shared();

        Self { resource, pending }
    }

    pub fn is_resolved(&self) -> bool {
        self.pending.peek().is_some()
    }
}

impl Debug for EagerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerSource")
            .field("resource", &self.resource)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[async_trait]
impl SnapshotSource for EagerSource {
    fn resource(&self) -> Resource {
        self.resource
    }

    async fn latest(&self) -> FetchResult<serde_json::Value> {
        self.pending.clone().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scripted::ScriptedFetcher;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_on_demand_issues_a_request_per_call() {
        let fetcher = ScriptedFetcher::always(json!({"running": true}));
        let source = OnDemandSource::new(fetcher.clone(), Resource::Summary);

        source.latest().await.unwrap();
        source.latest().await.unwrap();

        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_on_demand_sees_server_changes() {
        let fetcher = ScriptedFetcher::new();
        fetcher.push(Duration::ZERO, Ok(json!({"v": 1})));
        fetcher.push(Duration::ZERO, Ok(json!({"v": 2})));
        let source = OnDemandSource::new(fetcher.clone(), Resource::Controls);

        assert_eq!(source.latest().await.unwrap(), json!({"v": 1}));
        assert_eq!(source.latest().await.unwrap(), json!({"v": 2}));
    }

    #[tokio::test]
    async fn test_eager_source_requests_once_and_goes_stale() {
        let fetcher = ScriptedFetcher::new();
        fetcher.push(Duration::ZERO, Ok(json!([{"name": "T1", "value": 1}])));
        fetcher.set_fallback(Ok(json!([{"name": "T1", "value": 2}])));

        let source = EagerSource::spawn(fetcher.clone(), Resource::Tags);
        let first = source.latest().await.unwrap();
        assert!(source.is_resolved());

        let second = source.latest().await.unwrap();
        let third = source.latest().await.unwrap();

        assert_eq!(first, json!([{"name": "T1", "value": 1}]));
        assert_eq!(second, first);
        assert_eq!(third, first);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_eager_source_keeps_its_failure() {
        let fetcher = ScriptedFetcher::new();
        fetcher.push(Duration::ZERO, Err(FetchError::failed("/api/rules", "HTTP 500")));
        fetcher.set_fallback(Ok(json!({"rule": "ok"})));

        let source = EagerSource::spawn(fetcher.clone(), Resource::Rules);
        assert!(source.latest().await.is_err());
        assert!(source.latest().await.is_err());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_build_source_respects_mode() {
        let fetcher = ScriptedFetcher::always(json!({}));
        let eager = build_source(FetchMode::EagerSingleton, fetcher.clone(), Resource::Alarms);
        let on_demand = build_source(FetchMode::OnDemand, fetcher.clone(), Resource::Alarms);

        for _ in 0..3 {
            eager.latest().await.unwrap();
        }
        assert_eq!(fetcher.calls(), 1);

        for _ in 0..3 {
            on_demand.latest().await.unwrap();
        }
        assert_eq!(fetcher.calls(), 4);
        assert_eq!(on_demand.resource(), Resource::Alarms);
    }
}
