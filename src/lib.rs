pub mod util;
pub mod error;
pub mod api;
pub mod poll;
pub mod view;
pub mod config;
pub mod event;
pub mod app;
pub mod ui;

pub use api::{ApiClient, CacheMode, FetchMode, Resource};
pub use config::DashboardConfig;
pub use poll::{OverlapPolicy, PollState, Poller, PollerHandle, Snapshot, SnapshotCell};
pub use view::{ResourceView, ViewSettings};
