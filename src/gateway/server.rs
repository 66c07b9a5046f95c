//! Gateway Server
//!
//! hyper 1.x plumbing: the accept loop, per-connection tasks, identity
//! extraction and route dispatch. Handlers live in `files.rs` and
//! `folders.rs`; everything they need from the request is resolved here.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, Uri};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::gateway::{auth, files, folders, response};
use crate::metadata::MetadataStore;
use crate::pool::NodePool;

/// State shared by every request handler.
pub struct AppState {
    pub pool: Arc<NodePool>,
    pub store: Arc<dyn MetadataStore>,
}

/// Bind the gateway listener.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid gateway address: {}", e)))?;

    TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind gateway listener: {}", e)))
}

/// Serve connections on an already-bound listener.
///
/// Split from [`run`] so tests can bind to an ephemeral port first and read
/// the address back.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    info!("Gateway listening on {}", listener.local_addr()?);

    loop {
        let (stream, _) = listener
            .accept()
            .await
            .map_err(|e| Error::Internal(format!("Gateway accept error: {}", e)))?;

        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |req| handle(Arc::clone(&state), req));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                error!("Gateway connection error: {}", e);
            }
        });
    }
}

/// Bind and serve.
pub async fn run(addr: &str, state: Arc<AppState>) -> Result<()> {
    serve(bind(addr).await?, state).await
}

async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match route(state, req).await {
        Ok(response) => response,
        Err(e) => response::from_error(&e),
    };

    debug!("{} {} -> {}", method, path, response.status());
    Ok(response)
}

async fn route(state: Arc<AppState>, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
    let Some(owner) = auth::identity(req.headers()) else {
        return Ok(response::unauthorized());
    };

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (&method, segments.as_slice()) {
        (&Method::POST, ["api", "v1", "files"]) => files::upload(&state, &owner, req).await,
        (&Method::GET, ["api", "v1", "files", id]) => files::download(&state, &owner, id).await,
        (&Method::GET, ["api", "v1", "files", id, "info"]) => {
            files::info(&state, &owner, id).await
        }
        (&Method::HEAD, ["api", "v1", "files", id]) => files::exists(&state, &owner, id).await,
        (&Method::DELETE, ["api", "v1", "files", id]) => files::delete(&state, &owner, id).await,
        (&Method::POST, ["api", "v1", "folders"]) => folders::create(&state, &owner, req).await,
        (&Method::GET, ["api", "v1", "tree"]) => folders::tree(&state, &owner).await,
        _ => Ok(response::not_found("Unknown route")),
    }
}

/// Percent-decoded query parameter by name.
pub(crate) fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == name {
            return urlencoding::decode(value).ok().map(|v| v.into_owned());
        }
    }
    None
}

/// Buffer an entire request body.
pub(crate) async fn read_body(body: Incoming) -> Result<Bytes> {
    Ok(body
        .collect()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read request body: {}", e)))?
        .to_bytes())
}
