// src/view.rs
//! One resource screen's worth of state: its source, its snapshot and, for
//! resources that refresh on a timer, the poller feeding it.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::api::{build_source, FetchMode, Resource, ResourceFetcher, SnapshotSource};
use crate::poll::{OverlapPolicy, PollState, Poller, PollerHandle, Snapshot, SnapshotCell};
use crate::{log_info, log_warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewSettings {
    pub fetch_mode: FetchMode,
    pub overlap: OverlapPolicy,
    /// `None` means the resource is only fetched on activation and refresh.
    pub poll_interval: Option<Duration>,
}

#[derive(Debug)]
pub struct ResourceView {
    resource: Resource,
    settings: ViewSettings,
    source: Arc<dyn SnapshotSource>,
    cell: SnapshotCell,
    poller: Option<PollerHandle>,
    refreshes: Vec<JoinHandle<()>>,
    active: bool,
}

impl ResourceView {
    /// Must be called inside a tokio runtime.
    pub fn activate(
        fetcher: Arc<dyn ResourceFetcher>,
        resource: Resource,
        settings: ViewSettings,
    ) -> Self {
        let source = build_source(settings.fetch_mode, fetcher, resource);
        Self::with_source(source, resource, settings)
    }

    /// Activates a view over an existing source, e.g. an eager singleton
    /// that outlives any one screen.
    pub fn with_source(
        source: Arc<dyn SnapshotSource>,
        resource: Resource,
        settings: ViewSettings,
    ) -> Self {
        log_info!("Activating {} view ({:?})", resource.label(), settings.fetch_mode);

        let cell = SnapshotCell::new(resource);

        let poller = settings.poll_interval.map(|interval| {
            Poller::new(source.clone(), cell.clone())
                .with_interval(interval)
                .with_overlap(settings.overlap)
                .start()
        });

        let mut view = Self {
            resource,
            settings,
            source,
            cell,
            poller,
            refreshes: Vec::new(),
            active: true,
        };

        if view.poller.is_none() {
            view.refresh();
        }

        view
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> Snapshot {
        self.cell.read()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .as_ref()
            .is_some_and(|p| p.state() == PollState::Polling)
    }

    /// One fetch outside the timer, applied like any tick.
    pub fn refresh(&mut self) {
        if !self.active {
            log_warn!("Ignoring refresh on inactive {} view", self.resource.label());
            return;
        }

        self.refreshes.retain(|task| !task.is_finished());

        let tick = self.cell.begin_tick();
        let source = self.source.clone();
        let cell = self.cell.clone();
        let overlap = self.settings.overlap;

        self.refreshes.push(tokio::spawn(async move {
            let result = source.latest().await;
            if let Err(e) = &result {
                log_warn!("Refresh of {} failed: {}", source.resource().path(), e);
            }
            cell.apply(tick, result, overlap);
        }));
    }

    /// Stops the poller and any pending refreshes. The view cannot be
    /// reactivated; build a new one instead.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(poller) = self.poller.as_mut() {
            poller.stop();
        }
        for task in self.refreshes.drain(..) {
            task.abort();
        }
        log_info!("Deactivated {} view", self.resource.label());
    }
}

impl Drop for ResourceView {
    fn drop(&mut self) {
        self.deactivate();
    }
}
