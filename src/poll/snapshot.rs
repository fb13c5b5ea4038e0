// src/poll/snapshot.rs
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::api::Resource;
use crate::error::{FetchError, FetchResult};

/// What to do when responses from overlapping ticks complete out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Apply every completion as it lands. A slow response from an older
    /// tick can overwrite a newer one.
    #[default]
    Tolerate,
    /// Drop completions from ticks older than the last one applied.
    LatestWins,
}

/// The data a view renders, plus bookkeeping about how it got there.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub resource: Resource,
    pub data: serde_json::Value,
    /// Tick whose response produced `data`.
    pub applied_tick: Option<u64>,
    pub updated_at: Option<DateTime<Local>>,
    pub updates: u64,
    /// Set when the most recent completed fetch failed; `data` is then stale.
    pub last_error: Option<FetchError>,
}

impl Snapshot {
    pub fn empty(resource: Resource) -> Self {
        Self {
            resource,
            data: resource.empty_snapshot(),
            applied_tick: None,
            updated_at: None,
            updates: 0,
            last_error: None,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn has_data(&self) -> bool {
        self.updates > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Updated,
    Failed,
    /// A newer tick already landed and the policy says keep it.
    Superseded,
}

/// Shared handle to a resource's current snapshot. Clones point at the same
/// snapshot, so the view and the polling task always agree.
#[derive(Debug, Clone)]
pub struct SnapshotCell {
    inner: Arc<RwLock<Snapshot>>,
    next_tick: Arc<AtomicU64>,
}

impl SnapshotCell {
    pub fn new(resource: Resource) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot::empty(resource))),
            next_tick: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn resource(&self) -> Resource {
        self.read().resource
    }

    /// Numbers a request so its completion can be ordered against others.
    pub fn begin_tick(&self) -> u64 {
        self.next_tick.fetch_add(1, Ordering::SeqCst)
    }

    pub fn read(&self) -> Snapshot {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn data(&self) -> serde_json::Value {
        self.read().data
    }

    pub fn apply(
        &self,
        tick: u64,
        result: FetchResult<serde_json::Value>,
        policy: OverlapPolicy,
    ) -> ApplyOutcome {
        let mut snapshot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let superseded = policy == OverlapPolicy::LatestWins
            && snapshot.applied_tick.is_some_and(|applied| tick < applied);
        if superseded {
            return ApplyOutcome::Superseded;
        }

        match result {
            Ok(data) => {
                snapshot.data = data;
                snapshot.applied_tick = Some(tick);
                snapshot.updated_at = Some(Local::now());
                snapshot.updates += 1;
                snapshot.last_error = None;
                ApplyOutcome::Updated
            }
            Err(err) => {
                snapshot.last_error = Some(err);
                ApplyOutcome::Failed
            }
        }
    }

    /// Back to the empty container, as on a fresh view.
    pub fn reset(&self) {
        let mut snapshot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *snapshot = Snapshot::empty(snapshot.resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_cell_holds_empty_container() {
        let cell = SnapshotCell::new(Resource::Tags);
        let snapshot = cell.read();
        assert_eq!(snapshot.data, json!([]));
        assert!(!snapshot.has_data());
        assert!(!snapshot.is_stale());
    }

    #[test]
    fn test_success_overwrites_wholesale() {
        let cell = SnapshotCell::new(Resource::Summary);
        cell.apply(cell.begin_tick(), Ok(json!({"a": 1, "b": 2})), OverlapPolicy::Tolerate);
        cell.apply(cell.begin_tick(), Ok(json!({"c": 3})), OverlapPolicy::Tolerate);

        let snapshot = cell.read();
        assert_eq!(snapshot.data, json!({"c": 3}));
        assert_eq!(snapshot.updates, 2);
        assert_eq!(snapshot.applied_tick, Some(2));
        assert!(snapshot.updated_at.is_some());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let cell = SnapshotCell::new(Resource::Tags);
        cell.apply(1, Ok(json!([{"name": "T1"}])), OverlapPolicy::Tolerate);

        let outcome = cell.apply(2, Err(FetchError::failed("/api/tags", "HTTP 503")), OverlapPolicy::Tolerate);

        assert_eq!(outcome, ApplyOutcome::Failed);
        let snapshot = cell.read();
        assert_eq!(snapshot.data, json!([{"name": "T1"}]));
        assert!(snapshot.is_stale());
        assert_eq!(snapshot.last_error.unwrap().reason(), "HTTP 503");
    }

    #[test]
    fn test_success_clears_error() {
        let cell = SnapshotCell::new(Resource::Tags);
        cell.apply(1, Err(FetchError::failed("/api/tags", "refused")), OverlapPolicy::Tolerate);
        assert!(cell.read().is_stale());

        cell.apply(2, Ok(json!([])), OverlapPolicy::Tolerate);
        assert!(!cell.read().is_stale());
    }

    #[test]
    fn test_tolerate_applies_out_of_order_completion() {
        let cell = SnapshotCell::new(Resource::Tags);
        cell.apply(2, Ok(json!("newer")), OverlapPolicy::Tolerate);
        let outcome = cell.apply(1, Ok(json!("older")), OverlapPolicy::Tolerate);

        assert_eq!(outcome, ApplyOutcome::Updated);
        assert_eq!(cell.data(), json!("older"));
    }

    #[test]
    fn test_latest_wins_drops_older_completion() {
        let cell = SnapshotCell::new(Resource::Tags);
        cell.apply(2, Ok(json!("newer")), OverlapPolicy::LatestWins);
        let outcome = cell.apply(1, Ok(json!("older")), OverlapPolicy::LatestWins);
        let failed = cell.apply(1, Err(FetchError::failed("/api/tags", "late")), OverlapPolicy::LatestWins);

        assert_eq!(outcome, ApplyOutcome::Superseded);
        assert_eq!(failed, ApplyOutcome::Superseded);
        assert_eq!(cell.data(), json!("newer"));
        assert!(!cell.read().is_stale());
    }

    #[test]
    fn test_clones_share_state_and_reset() {
        let cell = SnapshotCell::new(Resource::Events);
        let view = cell.clone();
        cell.apply(1, Ok(json!({"e": 1})), OverlapPolicy::Tolerate);
        assert_eq!(view.data(), json!({"e": 1}));

        view.reset();
        assert_eq!(cell.read(), Snapshot::empty(Resource::Events));
    }
}
