//! Metrics module
//!
//! Prometheus collectors for pool observability, plus the text exposition
//! used by the metrics listener. Collectors are process-wide statics so the
//! monitor and the coordinator can record without threading handles around.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

/// Number of registered storage nodes
pub static NODES_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("dvfs_nodes_total", "Number of registered storage nodes").unwrap()
});

/// Number of nodes currently marked healthy
pub static NODES_HEALTHY: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "dvfs_nodes_healthy",
        "Number of storage nodes currently marked healthy"
    )
    .unwrap()
});

/// Completed probe sweeps
pub static PROBE_SWEEPS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "dvfs_probe_sweeps_total",
        "Total number of completed health probe sweeps"
    )
    .unwrap()
});

/// Node health flag flips observed by probe sweeps
pub static NODE_STATE_CHANGES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "dvfs_node_state_changes_total",
        "Total number of node health state changes"
    )
    .unwrap()
});

/// Upload attempts that failed over to another node
pub static UPLOAD_FAILOVERS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "dvfs_upload_failovers_total",
        "Total number of upload attempts that failed over to another node"
    )
    .unwrap()
});

/// Terminal upload outcomes by result
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dvfs_uploads_total",
        "Total number of pool uploads by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Delete outcomes by result
pub static DELETES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dvfs_deletes_total",
        "Total number of pool deletes by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Encode every registered collector in Prometheus text format.
///
/// Returns the encoded body and its content type.
pub fn gather_text() -> (Vec<u8>, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    (buffer, encoder.format_type().to_string())
}
