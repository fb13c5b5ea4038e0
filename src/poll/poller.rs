// src/poll/poller.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::SnapshotSource;
use crate::poll::snapshot::{ApplyOutcome, OverlapPolicy, SnapshotCell};
use crate::{log_debug, log_info, log_warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Stopped,
}

/// Refreshes a snapshot cell from a source on a fixed interval.
///
/// The first tick fires one full interval after [`Poller::start`]. Each tick
/// runs its request as its own task, so a slow response never holds up the
/// next tick and requests may overlap.
#[derive(Debug)]
pub struct Poller {
    source: Arc<dyn SnapshotSource>,
    cell: SnapshotCell,
    interval: Duration,
    overlap: OverlapPolicy,
}

impl Poller {
    pub fn new(source: Arc<dyn SnapshotSource>, cell: SnapshotCell) -> Self {
        Self {
            source,
            cell,
            interval: DEFAULT_POLL_INTERVAL,
            overlap: OverlapPolicy::default(),
        }
    }

    /// Zero is clamped to one millisecond; tokio's interval panics on zero.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn start(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let ticks = Arc::new(AtomicU64::new(0));
        let cell = self.cell.clone();
        let interval = self.interval;

        let task = tokio::spawn(self.run(shutdown_rx, ticks.clone()));

        PollerHandle {
            cell,
            interval,
            ticks,
            shutdown: Some(shutdown_tx),
            task: Some(task),
            state: PollState::Polling,
        }
    }

    async fn run(self, mut shutdown: oneshot::Receiver<()>, ticks: Arc<AtomicU64>) {
        let path = self.source.resource().path();
        log_info!("Polling {} every {}ms", path, self.interval.as_millis());

        let mut timer = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                // Fires on an explicit stop and when the handle is dropped.
                _ = &mut shutdown => break,

                _ = timer.tick() => {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    let tick = self.cell.begin_tick();
                    let source = self.source.clone();
                    let cell = self.cell.clone();
                    let overlap = self.overlap;

                    in_flight.spawn(async move {
                        let result = source.latest().await;
                        if let Err(e) = &result {
                            log_warn!("Tick {} for {} failed: {}", tick, path, e);
                        }
                        if cell.apply(tick, result, overlap) == ApplyOutcome::Superseded {
                            log_debug!("Dropped late response from tick {} for {}", tick, path);
                        }
                    });
                }

                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            }
        }

        in_flight.abort_all();
        log_info!("Stopped polling {}", path);
    }
}

/// Owns a running poller. Stopping is one-way; dropping the handle stops it.
#[derive(Debug)]
pub struct PollerHandle {
    cell: SnapshotCell,
    interval: Duration,
    ticks: Arc<AtomicU64>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    state: PollState,
}

impl PollerHandle {
    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timer ticks fired so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn cell(&self) -> &SnapshotCell {
        &self.cell
    }

    /// Cancels the timer and every in-flight request. No request is issued
    /// after this returns. Calling it again does nothing.
    pub fn stop(&mut self) {
        if self.state == PollState::Stopped {
            return;
        }
        self.state = PollState::Stopped;

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }

    /// Stops and waits for the polling task to wind down.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
