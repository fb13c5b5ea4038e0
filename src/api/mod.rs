pub mod client;
pub mod resource;
pub mod source;

#[cfg(test)]
pub(crate) mod scripted;

pub use client::{ApiClient, CacheMode};
pub use resource::Resource;
pub use source::{build_source, EagerSource, FetchMode, OnDemandSource, ResourceFetcher, SnapshotSource};
