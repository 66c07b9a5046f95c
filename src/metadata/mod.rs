//! Metadata Module
//!
//! File and folder records plus the persistence port the gateway talks to.
//! The relational production store lives behind [`MetadataStore`]; the
//! in-memory adapter backs tests and single-process deployments.
//!
//! - **Records** (this file): the owner-scoped rows the gateway persists
//! - **Store** (`store.rs`): the async port
//! - **Memory** (`memory.rs`): DashMap-backed adapter

pub mod memory;
pub mod store;

pub use memory::InMemoryMetadataStore;
pub use store::MetadataStore;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One stored file, owned by an opaque caller identity.
///
/// `node_base_url` plus `content_id` are the durable pointer to the bytes;
/// `content_url` is the node-relative URL used for the download redirect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub extension: String,
    pub node_base_url: String,
    pub content_id: String,
    pub content_url: String,
    pub virtual_path: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One folder in a caller's virtual namespace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub id: Uuid,
    /// Last path segment
    pub name: String,
    /// Absolute virtual path
    pub path: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FolderRecord {
    /// New folder record at an absolute path; the name is the final segment.
    pub fn new(path: impl Into<String>, owner: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or("/")
            .to_string();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            path,
            owner: owner.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
