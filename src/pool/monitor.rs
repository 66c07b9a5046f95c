//! Health Monitor
//!
//! Periodically (and on demand) probes every registered node and writes the
//! results back into the [`NodeRegistry`]. Individual probe failures are
//! absorbed into an unhealthy flag and never surface as errors; only the
//! registry state and the logs change.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::metrics;
use crate::pool::registry::{NodeRegistry, StorageNode};

/// Timeout for a single health probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one full probe sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSummary {
    /// Nodes probed
    pub total: usize,

    /// Nodes that answered with a success status
    pub healthy: usize,

    /// Nodes whose health flag flipped during this sweep
    pub changed: usize,
}

/// Probes storage nodes and maintains their health flags
pub struct HealthMonitor {
    registry: Arc<NodeRegistry>,
    client: Client,
    // Held for the duration of a sweep; try_lock failure means in flight.
    sweep_lock: Mutex<()>,
}

impl HealthMonitor {
    /// Create a monitor over the given registry.
    pub fn new(registry: Arc<NodeRegistry>) -> Result<Arc<Self>> {
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Arc::new(Self {
            registry,
            client,
            sweep_lock: Mutex::new(()),
        }))
    }

    /// Probe a single node's health endpoint.
    ///
    /// Healthy iff the response arrives within [`PROBE_TIMEOUT`] with a 2xx
    /// status. Transport errors, timeouts and non-2xx statuses all report
    /// `false`; nothing is raised to the caller.
    #[instrument(skip(self, node), fields(node_id = %node.id))]
    pub async fn probe_one(&self, node: &StorageNode) -> bool {
        match self.client.get(node.health_url()).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!(
                    "Probe of node {} returned status {}",
                    node.id,
                    response.status()
                );
                false
            }
            Err(e) => {
                debug!("Probe of node {} failed: {}", node.id, e);
                false
            }
        }
    }

    /// Probe every registered node concurrently and write the results back.
    ///
    /// Single-flight: if a sweep is already running, this call is a no-op
    /// returning `None` rather than a queued run, bounding resource usage
    /// when nodes hang close to the probe timeout.
    pub async fn probe_all(&self) -> Option<ProbeSummary> {
        let Ok(_guard) = self.sweep_lock.try_lock() else {
            debug!("Probe sweep already in flight, skipping");
            return None;
        };
        Some(self.sweep().await)
    }

    /// Like [`HealthMonitor::probe_all`], but when a sweep is already in
    /// flight this waits for it to finish instead of skipping, so the
    /// registry reflects a completed sweep by the time this returns.
    pub async fn probe_all_or_join(&self) {
        match self.sweep_lock.try_lock() {
            Ok(_guard) => {
                self.sweep().await;
            }
            Err(_) => {
                debug!("Probe sweep already in flight, waiting for it to finish");
                let _guard = self.sweep_lock.lock().await;
            }
        }
    }

    #[instrument(skip(self))]
    async fn sweep(&self) -> ProbeSummary {
        let nodes = self.registry.all();
        let results =
            futures::future::join_all(nodes.iter().map(|node| self.probe_one(node))).await;

        let now = Utc::now();
        let mut healthy = 0;
        let mut changed = 0;

        for (node, is_healthy) in nodes.iter().zip(results) {
            if self.registry.set_health(&node.id, is_healthy, now) {
                changed += 1;
                info!(
                    "Node {} health status changed: {}",
                    node.id,
                    if is_healthy { "healthy" } else { "unhealthy" }
                );
            }
            if is_healthy {
                healthy += 1;
            }
        }

        metrics::NODES_TOTAL.set(nodes.len() as i64);
        metrics::NODES_HEALTHY.set(healthy as i64);
        metrics::PROBE_SWEEPS.inc();
        metrics::NODE_STATE_CHANGES.inc_by(changed as u64);

        info!(
            "Probe sweep complete: {}/{} nodes healthy ({} changed)",
            healthy,
            nodes.len(),
            changed
        );

        ProbeSummary {
            total: nodes.len(),
            healthy,
            changed,
        }
    }

    /// Start the periodic probe schedule.
    ///
    /// The interval is read once; ticks that land while a sweep is still
    /// running are skipped by the single-flight guard. The task only stops
    /// when the returned handle is aborted.
    pub fn start(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            // The first interval tick completes immediately; consume it so
            // the schedule begins one full period after startup.
            tick.tick().await;
            loop {
                tick.tick().await;
                if monitor.probe_all().await.is_none() {
                    debug!("Scheduled probe sweep skipped, previous sweep still running");
                }
            }
        })
    }
}
