// src/config.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{CacheMode, FetchMode, Resource};
use crate::error::{ConfigError, Result};
use crate::poll::{OverlapPolicy, DEFAULT_POLL_INTERVAL};
use crate::view::ViewSettings;
use crate::log_info;

pub const CONFIG_ENV_VAR: &str = "RACKIO_ADMIN_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./rackio-admin.yml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Omit for resources that are only fetched when their view opens.
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub fetch_mode: FetchMode,
    pub overlap: OverlapPolicy,
    pub cache: CacheMode,
    pub request_timeout_ms: Option<u64>,
    pub log_dir: PathBuf,
    pub debug: bool,
    pub resources: BTreeMap<Resource, ResourceConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mut resources = BTreeMap::new();
        resources.insert(
            Resource::Tags,
            ResourceConfig {
                poll_interval_ms: Some(DEFAULT_POLL_INTERVAL.as_millis() as u64),
            },
        );

        Self {
            base_url: "http://localhost:8000".to_string(),
            fetch_mode: FetchMode::default(),
            overlap: OverlapPolicy::default(),
            cache: CacheMode::default(),
            request_timeout_ms: None,
            log_dir: PathBuf::from("./logs"),
            debug: false,
            resources,
        }
    }
}

impl DashboardConfig {
    /// First CLI argument, then the env var, then the default path.
    pub fn resolve_path(cli_arg: Option<String>) -> PathBuf {
        cli_arg
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Missing file means defaults; a file that exists must parse.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log_info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        log_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: DashboardConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;

        for (resource, resource_config) in &self.resources {
            if resource_config.poll_interval_ms == Some(0) {
                return Err(ConfigError::InvalidInterval(resource.key().to_string()));
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self, resource: Resource) -> Option<Duration> {
        self.resources
            .get(&resource)
            .and_then(|r| r.poll_interval_ms)
            .map(Duration::from_millis)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn view_settings(&self, resource: Resource) -> ViewSettings {
        ViewSettings {
            fetch_mode: self.fetch_mode,
            overlap: self.overlap,
            poll_interval: self.poll_interval(resource),
        }
    }
}
