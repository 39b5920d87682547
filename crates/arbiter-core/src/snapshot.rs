//! Cluster snapshots for offline evaluation.
//!
//! A snapshot is the node and queue lists a host scheduler would hand to a
//! policy for one cycle. Files ending in `.toml` are read as TOML, anything
//! else as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Node, Queue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub queues: Vec<Queue>,
}

impl ClusterSnapshot {
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Ok(serde_json::from_str(&content)?),
        }
    }
}
