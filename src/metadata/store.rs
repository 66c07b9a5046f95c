//! Metadata Store Port
//!
//! Abstracts persistence of file and folder records so the gateway core
//! stays independent of the backing database. Every query is scoped to one
//! owner; records belonging to other identities are never visible through
//! this trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::metadata::{FileRecord, FolderRecord};

/// Port for owner-scoped metadata persistence.
///
/// The `list_*` methods return records in path-ascending order; the tree
/// builder relies on that ordering for deterministic output.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Persist a file record.
    async fn save_file(&self, record: FileRecord) -> Result<FileRecord>;

    /// Look up one file by id.
    async fn find_file(&self, owner: &str, id: Uuid) -> Result<Option<FileRecord>>;

    /// Remove a file record. Returns the removed record, if any.
    async fn delete_file(&self, owner: &str, id: Uuid) -> Result<Option<FileRecord>>;

    /// All of an owner's files, path-ascending.
    async fn list_files(&self, owner: &str) -> Result<Vec<FileRecord>>;

    /// Persist a folder record.
    async fn save_folder(&self, record: FolderRecord) -> Result<FolderRecord>;

    /// Look up a folder by its absolute path.
    async fn find_folder_by_path(&self, owner: &str, path: &str) -> Result<Option<FolderRecord>>;

    /// All of an owner's folders, path-ascending.
    async fn list_folders(&self, owner: &str) -> Result<Vec<FolderRecord>>;
}
