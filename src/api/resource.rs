// src/api/resource.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the REST collections exposed under `/api`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Tags,
    Summary,
    Controls,
    Rules,
    Alarms,
    Events,
}

impl Resource {
    pub fn all() -> [Resource; 6] {
        [
            Resource::Tags,
            Resource::Summary,
            Resource::Controls,
            Resource::Rules,
            Resource::Alarms,
            Resource::Events,
        ]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Resource::Tags => "/api/tags",
            Resource::Summary => "/api/summary",
            Resource::Controls => "/api/controls",
            Resource::Rules => "/api/rules",
            Resource::Alarms => "/api/alarms",
            Resource::Events => "/api/events",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resource::Tags => "Tags",
            Resource::Summary => "Summary",
            Resource::Controls => "Controls",
            Resource::Rules => "Rules",
            Resource::Alarms => "Alarms",
            Resource::Events => "Events",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Resource::Tags => "tags",
            Resource::Summary => "summary",
            Resource::Controls => "controls",
            Resource::Rules => "rules",
            Resource::Alarms => "alarms",
            Resource::Events => "events",
        }
    }

    /// What a view shows before the first response arrives.
    /// Tags is a list; everything else is keyed.
    pub fn empty_snapshot(&self) -> serde_json::Value {
        match self {
            Resource::Tags => serde_json::Value::Array(Vec::new()),
            _ => serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::all()
            .into_iter()
            .find(|r| r.key().eq_ignore_ascii_case(s.trim()) || r.path() == s.trim())
            .ok_or_else(|| format!("Unknown resource: {}", s))
    }
}
