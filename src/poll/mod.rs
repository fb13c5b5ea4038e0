pub mod poller;
pub mod snapshot;

pub use poller::{PollState, Poller, PollerHandle, DEFAULT_POLL_INTERVAL};
pub use snapshot::{ApplyOutcome, OverlapPolicy, Snapshot, SnapshotCell};
