//! Folder Handlers
//!
//! Folder creation and the namespace tree view.

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::gateway::response;
use crate::gateway::server::{read_body, AppState};
use crate::metadata::FolderRecord;
use crate::tree::{FilePlacement, TreeBuilder};

#[derive(Debug, Deserialize)]
struct CreateFolderRequest {
    path: String,
}

/// `POST /api/v1/folders` — create a folder at an absolute path.
///
/// Creating a path that already exists returns the existing record with
/// 200 instead of a duplicate.
pub async fn create(
    state: &AppState,
    owner: &str,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>> {
    let body = read_body(req.into_body()).await?;
    let request: CreateFolderRequest = serde_json::from_slice(&body)
        .map_err(|e| Error::InvalidPath(format!("Invalid folder request: {}", e)))?;

    validate_folder_path(&request.path)?;

    if let Some(existing) = state
        .store
        .find_folder_by_path(owner, &request.path)
        .await?
    {
        return Ok(response::json(StatusCode::OK, &existing));
    }

    let record = state
        .store
        .save_folder(FolderRecord::new(request.path, owner))
        .await?;
    info!("Created folder {} for {}", record.path, owner);
    Ok(response::json(StatusCode::CREATED, &record))
}

/// `GET /api/v1/tree` — the caller's full namespace tree.
pub async fn tree(state: &AppState, owner: &str) -> Result<Response<Full<Bytes>>> {
    let folders = state.store.list_folders(owner).await?;
    let files = state.store.list_files(owner).await?;

    let folder_paths: Vec<String> = folders.into_iter().map(|record| record.path).collect();
    let placements: Vec<FilePlacement> = files
        .into_iter()
        .map(|record| FilePlacement {
            virtual_path: record.virtual_path,
            id: record.id.to_string(),
            size: record.size,
            content_type: record.content_type,
        })
        .collect();

    let tree = TreeBuilder::build(&folder_paths, &placements);
    Ok(response::json(StatusCode::OK, &tree))
}

fn validate_folder_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(Error::InvalidPath(format!(
            "Folder path must be absolute: {}",
            path
        )));
    }
    if !path.split('/').any(|segment| !segment.is_empty()) {
        return Err(Error::InvalidPath(
            "Folder path must have at least one segment".to_string(),
        ));
    }
    Ok(())
}
