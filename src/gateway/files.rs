//! File Handlers
//!
//! Upload, download redirect, info, existence and delete. Content bytes
//! never rest in the gateway: uploads stream to a pool node and downloads
//! redirect the client to the node that holds the content.

use chrono::Utc;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{header, Request, Response, StatusCode};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::gateway::response;
use crate::gateway::server::{query_param, read_body, AppState};
use crate::metadata::FileRecord;

/// Header naming the uploaded file; defaults to the virtual path's leaf.
pub const FILENAME_HEADER: &str = "x-filename";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// `POST /api/v1/files?virtualPath=/a/b/c.txt` — raw body upload.
pub async fn upload(
    state: &AppState,
    owner: &str,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>> {
    let virtual_path = query_param(req.uri(), "virtualPath")
        .ok_or_else(|| Error::InvalidPath("Missing virtualPath query parameter".to_string()))?;
    let leaf = validate_file_path(&virtual_path)?;

    let filename = req
        .headers()
        .get(FILENAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or(leaf);

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let content = read_body(req.into_body()).await?;
    let size = content.len() as u64;

    let stored = state.pool.store(content, &filename).await?;

    let now = Utc::now();
    let record = FileRecord {
        id: Uuid::new_v4(),
        extension: extension_of(&filename),
        filename,
        content_type,
        size,
        node_base_url: stored.node_base_url,
        content_id: stored.content_id,
        content_url: stored.url,
        virtual_path,
        owner: owner.to_string(),
        created_at: now,
        updated_at: now,
    };

    let saved = state.store.save_file(record).await?;
    info!(
        "Stored file {} at {} for {}",
        saved.id, saved.virtual_path, owner
    );
    Ok(response::json(StatusCode::CREATED, &saved))
}

/// `GET /api/v1/files/{id}` — redirect to the node holding the content.
pub async fn download(state: &AppState, owner: &str, id: &str) -> Result<Response<Full<Bytes>>> {
    let id = parse_id(id)?;
    match state.store.find_file(owner, id).await? {
        Some(record) => Ok(response::redirect(&format!(
            "{}{}",
            record.node_base_url, record.content_url
        ))),
        None => Ok(response::not_found("File not found")),
    }
}

/// `GET /api/v1/files/{id}/info` — the full metadata record.
pub async fn info(state: &AppState, owner: &str, id: &str) -> Result<Response<Full<Bytes>>> {
    let id = parse_id(id)?;
    match state.store.find_file(owner, id).await? {
        Some(record) => Ok(response::json(StatusCode::OK, &record)),
        None => Ok(response::not_found("File not found")),
    }
}

/// `HEAD /api/v1/files/{id}` — bodyless existence check.
pub async fn exists(state: &AppState, owner: &str, id: &str) -> Result<Response<Full<Bytes>>> {
    let id = parse_id(id)?;
    let status = if state.store.find_file(owner, id).await?.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok(response::empty(status))
}

/// `DELETE /api/v1/files/{id}` — node delete first, metadata second.
pub async fn delete(state: &AppState, owner: &str, id: &str) -> Result<Response<Full<Bytes>>> {
    let id = parse_id(id)?;
    let Some(record) = state.store.find_file(owner, id).await? else {
        return Ok(response::not_found("File not found"));
    };

    // Fail closed: the metadata row survives unless the node delete worked.
    state
        .pool
        .remove(&record.content_id, &record.node_base_url)
        .await?;
    state.store.delete_file(owner, id).await?;

    info!(
        "Deleted file {} at {} for {}",
        record.id, record.virtual_path, owner
    );
    Ok(response::empty(StatusCode::NO_CONTENT))
}

/// Validate an absolute virtual file path and return its leaf segment.
fn validate_file_path(path: &str) -> Result<String> {
    if !path.starts_with('/') {
        return Err(Error::InvalidPath(format!(
            "Virtual path must be absolute: {}",
            path
        )));
    }
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidPath(format!("Virtual path must name a file: {}", path)))
}

fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_string())
        .unwrap_or_default()
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| Error::InvalidPath(format!("Invalid file id: {}", id)))
}
