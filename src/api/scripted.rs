// src/api/scripted.rs
//! In-memory fetcher for tests: replays queued responses with a simulated
//! network delay and counts every request it receives.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::resource::Resource;
use crate::api::source::ResourceFetcher;
use crate::error::{FetchError, FetchResult};

#[derive(Debug)]
struct Scripted {
    delay: Duration,
    result: FetchResult<serde_json::Value>,
}

#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Mutex<Option<FetchResult<serde_json::Value>>>,
    fallback_delay: Mutex<Duration>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn always(value: serde_json::Value) -> Arc<Self> {
        let fetcher = Self::new();
        fetcher.set_fallback(Ok(value));
        fetcher
    }

    pub fn push(&self, delay: Duration, result: FetchResult<serde_json::Value>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Scripted { delay, result });
    }

    /// Returned once the queue is empty.
    pub fn set_fallback(&self, result: FetchResult<serde_json::Value>) {
        *self.fallback.lock().unwrap() = Some(result);
    }

    pub fn set_fallback_delay(&self, delay: Duration) {
        *self.fallback_delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceFetcher for ScriptedFetcher {
    async fn fetch(&self, resource: Resource) -> FetchResult<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = self.queue.lock().unwrap().pop_front();
        let (delay, result) = match next {
            Some(scripted) => (scripted.delay, scripted.result),
            None => {
                let delay = *self.fallback_delay.lock().unwrap();
                let result = self
                    .fallback
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| Err(FetchError::failed(resource.path(), "script exhausted")));
                (delay, result)
            }
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}
