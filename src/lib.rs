//! DVFS Gateway - Virtual Filesystem over Pooled Storage Nodes
//!
//! Exposes a single hierarchical file namespace to clients while physically
//! storing content on a pool of independent storage backends. Uploads are
//! spread round-robin across healthy nodes with transparent failover;
//! downloads redirect to the node holding the content; the namespace view
//! is rebuilt per request from flat path metadata.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           DVFS Gateway                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐     ┌─────────────┐     ┌─────────────────────┐  │
//! │  │  Gateway   │────▶│  Node Pool  │────▶│   Storage Nodes     │  │
//! │  │  (HTTP)    │     │  Manager    │     │   (HTTP backends)   │  │
//! │  └────────────┘     └─────────────┘     └─────────────────────┘  │
//! │        │                                                         │
//! │        ▼                                                         │
//! │  ┌────────────┐     ┌─────────────┐                              │
//! │  │  Metadata  │────▶│    Tree     │                              │
//! │  │   Store    │     │   Builder   │                              │
//! │  └────────────┘     └─────────────┘                              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - node-list document loading and validation
//! - [`error`] - error types
//! - [`gateway`] - HTTP surface (routes, auth, responses)
//! - [`metadata`] - file/folder records and the persistence port
//! - [`metrics`] - Prometheus collectors and exposition
//! - [`pool`] - node registry, health monitor, selector, coordinator
//! - [`tree`] - virtual path tree builder

pub mod config;
pub mod error;
pub mod gateway;
pub mod metadata;
pub mod metrics;
pub mod pool;
pub mod tree;

// Re-export commonly used types
pub use config::PoolConfig;
pub use error::{Error, Result};
pub use metadata::{FileRecord, FolderRecord, InMemoryMetadataStore, MetadataStore};
pub use pool::{NodePool, NodeRegistry, StorageNode, StoredFile};
pub use tree::{TreeBuilder, VirtualEntry};
