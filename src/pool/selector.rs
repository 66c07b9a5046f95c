//! Node Selector
//!
//! Round-robin rotation over the healthy subset of the registry. The cursor
//! is advanced before use, so with nodes `[a, b]` the first pick is `b`,
//! then `a`, then `b` again. The cursor grows monotonically and is reduced
//! modulo the healthy count at each pick; when the healthy set shrinks or
//! grows between picks the rotation stays valid, it just restarts its phase.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::error::{Error, Result};
use crate::pool::monitor::HealthMonitor;
use crate::pool::registry::{NodeRegistry, StorageNode};

/// Rotating picker over healthy nodes
pub struct NodeSelector {
    cursor: AtomicUsize,
}

impl NodeSelector {
    pub fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
        }
    }

    /// Advance the cursor and reduce it against the current healthy count.
    fn advance(&self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.cursor
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1)
            % len
    }

    /// Pick the next healthy node.
    ///
    /// If no node is currently marked healthy, one immediate probe sweep is
    /// run (joining a sweep already in flight rather than skipping it) and
    /// the healthy set re-read; if it is still empty the pool is considered
    /// down and [`Error::NoHealthyNodes`] is returned.
    pub async fn select(
        &self,
        registry: &NodeRegistry,
        monitor: &HealthMonitor,
    ) -> Result<StorageNode> {
        let mut healthy = registry.healthy();

        if healthy.is_empty() {
            info!("No healthy nodes available, running an immediate probe sweep");
            monitor.probe_all_or_join().await;
            healthy = registry.healthy();
        }

        if healthy.is_empty() {
            return Err(Error::NoHealthyNodes);
        }

        let index = self.advance(healthy.len());
        Ok(healthy[index].clone())
    }
}

impl Default for NodeSelector {
    fn default() -> Self {
        Self::new()
    }
}
