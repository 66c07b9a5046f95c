//! Shared test fixtures
//!
//! An in-process, scriptable storage node implementing the node contract:
//! `GET /health`, `POST /api/v1/files` (multipart) and
//! `DELETE /api/v1/files/{id}`. Tests flip its switches to simulate
//! unhealthy, rejecting or slow nodes.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use dvfs_gateway::config::{NodeDescriptor, PoolConfig};

/// A scriptable in-process storage node.
pub struct FakeNode {
    addr: SocketAddr,
    state: Arc<NodeState>,
}

struct NodeState {
    healthy: AtomicBool,
    accept_uploads: AtomicBool,
    accept_deletes: AtomicBool,
    probe_delay_ms: AtomicU64,
    probe_failures: AtomicUsize,
    health_hits: AtomicUsize,
    upload_hits: AtomicUsize,
    delete_hits: AtomicUsize,
}

impl FakeNode {
    /// Bind an ephemeral port and start serving the node contract.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(NodeState {
            healthy: AtomicBool::new(true),
            accept_uploads: AtomicBool::new(true),
            accept_deletes: AtomicBool::new(true),
            probe_delay_ms: AtomicU64::new(0),
            probe_failures: AtomicUsize::new(0),
            health_hits: AtomicUsize::new(0),
            upload_hits: AtomicUsize::new(0),
            delete_hits: AtomicUsize::new(0),
        });

        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let io = TokioIo::new(stream);
                let state = Arc::clone(&accept_state);
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(Arc::clone(&state), req));
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn descriptor(&self, id: &str) -> NodeDescriptor {
        NodeDescriptor {
            id: id.to_string(),
            base_url: self.base_url(),
            health_endpoint: "/health".to_string(),
        }
    }

    /// Whether `GET /health` answers 200.
    pub fn set_healthy(&self, healthy: bool) {
        self.state.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Whether uploads are accepted or rejected with a 500.
    pub fn set_accept_uploads(&self, accept: bool) {
        self.state.accept_uploads.store(accept, Ordering::SeqCst);
    }

    /// Whether deletes are accepted or rejected with a 500.
    pub fn set_accept_deletes(&self, accept: bool) {
        self.state.accept_deletes.store(accept, Ordering::SeqCst);
    }

    /// Answer the next `n` health probes with a 503, then recover.
    pub fn set_probe_failures(&self, n: usize) {
        self.state.probe_failures.store(n, Ordering::SeqCst);
    }

    /// Delay applied to every health probe response.
    pub fn set_probe_delay(&self, delay: Duration) {
        self.state
            .probe_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn health_hits(&self) -> usize {
        self.state.health_hits.load(Ordering::SeqCst)
    }

    pub fn upload_hits(&self) -> usize {
        self.state.upload_hits.load(Ordering::SeqCst)
    }

    pub fn delete_hits(&self) -> usize {
        self.state.delete_hits.load(Ordering::SeqCst)
    }
}

/// Node-list configuration over fake nodes, in the given order.
pub fn pool_config(nodes: &[(&str, &FakeNode)]) -> PoolConfig {
    PoolConfig {
        health_check_interval_ms: 10_000,
        nodes: nodes
            .iter()
            .map(|(id, node)| node.descriptor(id))
            .collect(),
    }
}

async fn handle(
    state: Arc<NodeState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    let response = match (method.as_str(), path.as_str()) {
        ("GET", "/health") => {
            state.health_hits.fetch_add(1, Ordering::SeqCst);
            let delay = state.probe_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if state
                .probe_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                text(StatusCode::SERVICE_UNAVAILABLE, "down")
            } else if state.healthy.load(Ordering::SeqCst) {
                text(StatusCode::OK, "ok")
            } else {
                text(StatusCode::SERVICE_UNAVAILABLE, "down")
            }
        }
        ("POST", "/api/v1/files") => {
            // Drain the multipart body before answering.
            let _ = req.into_body().collect().await;
            let n = state.upload_hits.fetch_add(1, Ordering::SeqCst) + 1;
            if state.accept_uploads.load(Ordering::SeqCst) {
                json(
                    StatusCode::CREATED,
                    format!(r#"{{"id":"c-{n}","url":"/api/v1/files/c-{n}"}}"#),
                )
            } else {
                text(StatusCode::INTERNAL_SERVER_ERROR, "upload rejected")
            }
        }
        ("DELETE", p) if p.starts_with("/api/v1/files/") => {
            state.delete_hits.fetch_add(1, Ordering::SeqCst);
            if state.accept_deletes.load(Ordering::SeqCst) {
                text(StatusCode::NO_CONTENT, "")
            } else {
                text(StatusCode::INTERNAL_SERVER_ERROR, "delete rejected")
            }
        }
        _ => text(StatusCode::NOT_FOUND, "not found"),
    };

    Ok(response)
}

fn text(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn json(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}
