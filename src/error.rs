//! Error types for the DVFS gateway

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the DVFS gateway
#[derive(Error, Debug)]
pub enum Error {
    /// Node list document missing or malformed. Non-fatal: callers log it
    /// and continue with an empty registry.
    #[error("Failed to load node configuration: {0}")]
    ConfigLoad(String),

    /// No storage node is currently marked healthy, even after an immediate
    /// on-demand probe sweep. Recoverable from the caller's point of view.
    #[error("No healthy storage nodes available")]
    NoHealthyNodes,

    /// A content upload to a specific node failed. Internal to the pool:
    /// it drives failover to another node and never reaches callers
    /// (exhaustion surfaces as [`Error::NoHealthyNodes`]).
    #[error("Upload to node {node_id} failed: {reason}")]
    Upload { node_id: String, reason: String },

    /// A content delete on the node that owns the content failed. Deletes
    /// are not re-routable, so this is surfaced as-is with no retry.
    #[error("Delete of {content_id} on node {node_url} failed: {reason}")]
    DeleteFailed {
        content_id: String,
        node_url: String,
        reason: String,
    },

    /// A virtual path supplied by a caller was not absolute or was empty.
    #[error("Invalid virtual path: {0}")]
    InvalidPath(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
