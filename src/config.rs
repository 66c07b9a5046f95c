//! Gateway configuration
//!
//! The pool is configured from a JSON node-list document:
//!
//! ```json
//! {
//!   "healthCheckIntervalMs": 10000,
//!   "nodes": [
//!     { "id": "node-1", "baseUrl": "http://node1:8080", "healthEndpoint": "/health" }
//!   ]
//! }
//! ```
//!
//! A missing or malformed document is not fatal to the process: loading
//! reports [`Error::ConfigLoad`] and callers fall back to an empty registry.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default probe interval when `healthCheckIntervalMs` is absent or invalid
pub const DEFAULT_HEALTH_CHECK_INTERVAL_MS: u64 = 10_000;

/// Static description of one storage node
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Stable node identifier
    pub id: String,

    /// Network origin, e.g. `http://node1:8080`
    pub base_url: String,

    /// Health probe path relative to `base_url`, e.g. `/health`
    pub health_endpoint: String,
}

/// The node-list document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfig {
    /// Probe interval in milliseconds; non-positive falls back to the default
    #[serde(default)]
    pub health_check_interval_ms: i64,

    /// Configured storage nodes, in selection order
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
}

impl PoolConfig {
    /// Load and parse the node-list document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    /// Parse the node-list document from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::ConfigLoad(e.to_string()))
    }

    /// Validated probe interval. The document value is taken only when
    /// positive; anything else yields the 10s default.
    pub fn health_check_interval(&self) -> Duration {
        if self.health_check_interval_ms > 0 {
            Duration::from_millis(self.health_check_interval_ms as u64)
        } else {
            Duration::from_millis(DEFAULT_HEALTH_CHECK_INTERVAL_MS)
        }
    }

    /// An empty configuration (no nodes, default interval)
    pub fn empty() -> Self {
        Self {
            health_check_interval_ms: 0,
            nodes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let config = PoolConfig::from_json(
            r#"{
                "healthCheckIntervalMs": 2500,
                "nodes": [
                    { "id": "node-1", "baseUrl": "http://node1:8080", "healthEndpoint": "/health" },
                    { "id": "node-2", "baseUrl": "http://node2:8080", "healthEndpoint": "/healthz" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.nodes.len(), 2);
        assert_eq!(config.nodes[0].id, "node-1");
        assert_eq!(config.nodes[1].base_url, "http://node2:8080");
        assert_eq!(config.nodes[1].health_endpoint, "/healthz");
        assert_eq!(config.health_check_interval(), Duration::from_millis(2500));
    }

    #[test]
    fn test_interval_defaults_when_absent() {
        let config = PoolConfig::from_json(r#"{ "nodes": [] }"#).unwrap();
        assert_eq!(
            config.health_check_interval(),
            Duration::from_millis(DEFAULT_HEALTH_CHECK_INTERVAL_MS)
        );
    }

    #[test]
    fn test_interval_defaults_when_non_positive() {
        for raw in [
            r#"{ "healthCheckIntervalMs": 0, "nodes": [] }"#,
            r#"{ "healthCheckIntervalMs": -500, "nodes": [] }"#,
        ] {
            let config = PoolConfig::from_json(raw).unwrap();
            assert_eq!(
                config.health_check_interval(),
                Duration::from_millis(DEFAULT_HEALTH_CHECK_INTERVAL_MS)
            );
        }
    }

    #[test]
    fn test_malformed_document_is_config_load_error() {
        let err = PoolConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }

    #[test]
    fn test_missing_file_is_config_load_error() {
        let err = PoolConfig::load("/nonexistent/nodes.json").unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }

    #[test]
    fn test_empty_config() {
        let config = PoolConfig::empty();
        assert!(config.nodes.is_empty());
        assert_eq!(
            config.health_check_interval(),
            Duration::from_millis(DEFAULT_HEALTH_CHECK_INTERVAL_MS)
        );
    }
}
