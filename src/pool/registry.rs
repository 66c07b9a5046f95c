//! Node Registry
//!
//! Canonical owner of the configured storage node set and each node's live
//! health state. The node set is fixed for the process lifetime; only the
//! health flags change, and only through [`NodeRegistry::set_health`].

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::config::PoolConfig;

/// A configured storage backend and its last observed health state
#[derive(Debug, Clone)]
pub struct StorageNode {
    /// Stable node identifier from configuration
    pub id: String,

    /// Network origin, e.g. `http://node1:8080`
    pub base_url: String,

    /// Health probe path relative to `base_url`
    pub health_endpoint: String,

    /// Whether the last probe (or write attempt) found the node reachable
    pub is_healthy: bool,

    /// When the health flag was last written
    pub last_checked: DateTime<Utc>,
}

impl StorageNode {
    /// Full probe URL for this node
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, self.health_endpoint)
    }
}

/// Registry of all configured nodes
///
/// Readers receive cloned snapshots; each node's flag is written
/// independently, so no atomic snapshot across nodes is provided (or
/// needed — content lives on exactly one node).
pub struct NodeRegistry {
    nodes: RwLock<Vec<StorageNode>>,
}

impl NodeRegistry {
    /// Build the registry from a parsed node-list document. All nodes start
    /// unhealthy until the first probe sweep promotes them.
    pub fn from_config(config: &PoolConfig) -> Self {
        let now = Utc::now();
        let nodes = config
            .nodes
            .iter()
            .map(|desc| StorageNode {
                id: desc.id.clone(),
                base_url: desc.base_url.clone(),
                health_endpoint: desc.health_endpoint.clone(),
                is_healthy: false,
                last_checked: now,
            })
            .collect();

        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// An empty registry (degraded but valid — every healthy() call yields
    /// an empty set until nodes exist)
    pub fn empty() -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of every configured node, in configuration order
    pub fn all(&self) -> Vec<StorageNode> {
        self.nodes.read().clone()
    }

    /// Snapshot of the currently healthy subset, in configuration order
    pub fn healthy(&self) -> Vec<StorageNode> {
        self.nodes
            .read()
            .iter()
            .filter(|node| node.is_healthy)
            .cloned()
            .collect()
    }

    /// Number of configured nodes
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// True when no nodes are configured
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Update one node's health state. The only mutation path; an unknown
    /// id is ignored.
    ///
    /// Returns `true` when the call flipped the node's health flag.
    pub fn set_health(&self, node_id: &str, healthy: bool, checked_at: DateTime<Utc>) -> bool {
        let mut nodes = self.nodes.write();
        if let Some(node) = nodes.iter_mut().find(|node| node.id == node_id) {
            let flipped = node.is_healthy != healthy;
            node.is_healthy = healthy;
            node.last_checked = checked_at;
            flipped
        } else {
            false
        }
    }
}
