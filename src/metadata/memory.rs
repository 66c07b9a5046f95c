//! In-Memory Metadata Store
//!
//! DashMap-backed adapter for the [`MetadataStore`] port. Used by tests and
//! single-process deployments; everything is lost on restart.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::metadata::store::MetadataStore;
use crate::metadata::{FileRecord, FolderRecord};

/// Process-local metadata store.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    files: DashMap<Uuid, FileRecord>,
    folders: DashMap<Uuid, FolderRecord>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn save_file(&self, record: FileRecord) -> Result<FileRecord> {
        self.files.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_file(&self, owner: &str, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self
            .files
            .get(&id)
            .filter(|record| record.owner == owner)
            .map(|record| record.value().clone()))
    }

    async fn delete_file(&self, owner: &str, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self
            .files
            .remove_if(&id, |_, record| record.owner == owner)
            .map(|(_, record)| record))
    }

    async fn list_files(&self, owner: &str) -> Result<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self
            .files
            .iter()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        files.sort_by(|a, b| a.virtual_path.cmp(&b.virtual_path));
        Ok(files)
    }

    async fn save_folder(&self, record: FolderRecord) -> Result<FolderRecord> {
        self.folders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_folder_by_path(&self, owner: &str, path: &str) -> Result<Option<FolderRecord>> {
        Ok(self
            .folders
            .iter()
            .find(|entry| entry.owner == owner && entry.path == path)
            .map(|entry| entry.value().clone()))
    }

    async fn list_folders(&self, owner: &str) -> Result<Vec<FolderRecord>> {
        let mut folders: Vec<FolderRecord> = self
            .folders
            .iter()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        folders.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(folders)
    }
}
