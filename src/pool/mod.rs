//! Storage Node Pool Manager
//!
//! Pools independent storage nodes behind one write/delete surface:
//!
//! - [`registry`] owns the canonical node list and health flags
//! - [`monitor`] probes nodes and keeps the flags current
//! - [`selector`] rotates uploads across the healthy subset
//! - [`NodePool`] coordinates uploads with failover and single-node deletes

pub mod monitor;
pub mod registry;
pub mod selector;

pub use monitor::{HealthMonitor, ProbeSummary, PROBE_TIMEOUT};
pub use registry::{NodeRegistry, StorageNode};
pub use selector::NodeSelector;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use parking_lot::Mutex;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::metrics;

/// Timeout for a content upload to a node
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a content delete on a node
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(5);

/// Path under which every node accepts and serves content
const NODE_FILES_PATH: &str = "/api/v1/files";

/// Location of content that was accepted by a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Node-assigned content identifier
    pub content_id: String,

    /// Node-relative URL under which the content is served
    pub url: String,

    /// Base URL of the node holding the content, the durable pointer the
    /// metadata layer persists for later deletion
    pub node_base_url: String,
}

#[derive(Debug, Deserialize)]
struct NodeUploadResponse {
    id: String,
    url: String,
}

/// Front door of the storage pool.
///
/// Uploads rotate across healthy nodes and fail over transparently; each
/// node is attempted at most once per call, so a call touches at most every
/// registered node before giving up. Deletes go to exactly the node that
/// holds the content and are never retried elsewhere.
pub struct NodePool {
    registry: Arc<NodeRegistry>,
    monitor: Arc<HealthMonitor>,
    selector: NodeSelector,
    client: Client,
    probe_interval: Duration,
    initialized: AtomicBool,
    scheduler: Mutex<Option<JoinHandle<()>>>,
}

impl NodePool {
    /// Build a pool from a node-list document.
    ///
    /// Every node starts unhealthy; nothing is selectable until a probe
    /// sweep has run (see [`NodePool::initialize`]).
    pub fn from_config(config: &PoolConfig) -> Result<Arc<Self>> {
        let registry = Arc::new(NodeRegistry::from_config(config));
        let monitor = HealthMonitor::new(Arc::clone(&registry))?;
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Arc::new(Self {
            registry,
            monitor,
            selector: NodeSelector::new(),
            client,
            probe_interval: config.health_check_interval(),
            initialized: AtomicBool::new(false),
            scheduler: Mutex::new(None),
        }))
    }

    /// Canonical node list and health flags.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Run the first probe sweep and start the periodic schedule.
    ///
    /// Idempotent: only the first call does anything, so concurrent or
    /// repeated initialization cannot start a second schedule.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            debug!("Node pool already initialized");
            return;
        }

        info!("Initializing node pool with {} nodes", self.registry.len());
        self.monitor.probe_all().await;

        if self.registry.healthy().is_empty() {
            warn!("No healthy storage nodes after the initial probe sweep");
        }

        let handle = self.monitor.start(self.probe_interval);
        *self.scheduler.lock() = Some(handle);
    }

    /// Stop the periodic probe schedule.
    pub fn shutdown(&self) {
        if let Some(handle) = self.scheduler.lock().take() {
            handle.abort();
            info!("Node pool probe schedule stopped");
        }
    }

    /// Upload content to the pool, failing over across healthy nodes.
    ///
    /// Each iteration picks the next healthy node, re-verifies it with a
    /// fresh probe and attempts the upload; a probe or upload failure marks
    /// the node unhealthy and moves on. A node is attempted at most once
    /// per call: the call gives up with [`Error::NoHealthyNodes`] only once
    /// every node in the current healthy set has been tried.
    #[instrument(skip(self, content), fields(filename = %filename, size = content.len()))]
    pub async fn store(&self, content: Bytes, filename: &str) -> Result<StoredFile> {
        let mut tried: HashSet<String> = HashSet::new();

        loop {
            let node = self.selector.select(&self.registry, &self.monitor).await?;

            if !tried.insert(node.id.clone()) {
                // A sweep can re-promote an already-tried node mid-call and
                // the rotation may land on it while untried healthy nodes
                // remain; keep rotating until the healthy set is exhausted.
                if self
                    .registry
                    .healthy()
                    .iter()
                    .all(|candidate| tried.contains(&candidate.id))
                {
                    warn!("Upload failed on every healthy node, giving up");
                    metrics::UPLOADS_TOTAL.with_label_values(&["error"]).inc();
                    return Err(Error::NoHealthyNodes);
                }
                continue;
            }

            // The health flag may be stale; re-verify right before writing.
            if !self.monitor.probe_one(&node).await {
                warn!("Node {} failed its pre-write probe, failing over", node.id);
                self.registry.set_health(&node.id, false, Utc::now());
                metrics::UPLOAD_FAILOVERS.inc();
                continue;
            }

            match self.upload_to(&node, filename, content.clone()).await {
                Ok(stored) => {
                    info!("Stored {} on node {}", filename, node.id);
                    metrics::UPLOADS_TOTAL.with_label_values(&["ok"]).inc();
                    return Ok(stored);
                }
                Err(e) => {
                    warn!("Upload to node {} failed, failing over: {}", node.id, e);
                    self.registry.set_health(&node.id, false, Utc::now());
                    metrics::UPLOAD_FAILOVERS.inc();
                }
            }
        }
    }

    async fn upload_to(
        &self,
        node: &StorageNode,
        filename: &str,
        content: Bytes,
    ) -> Result<StoredFile> {
        let part = Part::bytes(content.to_vec()).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}{}", node.base_url, NODE_FILES_PATH))
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Upload {
                node_id: node.id.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Upload {
                node_id: node.id.clone(),
                reason: format!("Node returned status {}", response.status()),
            });
        }

        let body: NodeUploadResponse = response.json().await.map_err(|e| Error::Upload {
            node_id: node.id.clone(),
            reason: format!("Invalid upload response: {}", e),
        })?;

        Ok(StoredFile {
            content_id: body.id,
            url: body.url,
            node_base_url: node.base_url.clone(),
        })
    }

    /// Delete content from the node that holds it.
    ///
    /// No retry and no failover: the content lives on exactly one node, so
    /// any failure surfaces as [`Error::DeleteFailed`] and the caller keeps
    /// its metadata (fail closed). Health flags are left to the monitor.
    #[instrument(skip(self))]
    pub async fn remove(&self, content_id: &str, node_base_url: &str) -> Result<()> {
        let result = self.delete_from(content_id, node_base_url).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::DELETES_TOTAL.with_label_values(&[outcome]).inc();
        result
    }

    async fn delete_from(&self, content_id: &str, node_base_url: &str) -> Result<()> {
        let url = format!("{}{}/{}", node_base_url, NODE_FILES_PATH, content_id);

        let response = self
            .client
            .delete(&url)
            .timeout(DELETE_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::DeleteFailed {
                content_id: content_id.to_string(),
                node_url: node_base_url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::DeleteFailed {
                content_id: content_id.to_string(),
                node_url: node_base_url.to_string(),
                reason: format!("Node returned status {}", response.status()),
            });
        }

        info!("Deleted content {} from {}", content_id, node_base_url);
        Ok(())
    }
}

impl Drop for NodePool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
