//! DVFS Gateway
//!
//! Virtual filesystem gateway over a pool of replicated-capacity storage
//! nodes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          DVFS Gateway                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐       │
//! │  │   Gateway    │───▶│  Node Pool   │───▶│   Storage    │       │
//! │  │   (HTTP)     │    │  (Failover)  │    │   Nodes      │       │
//! │  └──────────────┘    └──────────────┘    └──────────────┘       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dvfs_gateway::error::Result;
use dvfs_gateway::gateway::{self, AppState};
use dvfs_gateway::metadata::InMemoryMetadataStore;
use dvfs_gateway::metrics;
use dvfs_gateway::pool::NodePool;
use dvfs_gateway::PoolConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// DVFS Gateway - virtual filesystem over pooled storage nodes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the node-list document
    #[arg(long, env = "NODES_CONFIG", default_value = "config/nodes.json")]
    config: String,

    /// Gateway bind address
    #[arg(long, env = "GATEWAY_ADDR", default_value = "0.0.0.0:3000")]
    listen: String,

    /// Metrics server bind address
    #[arg(long, env = "METRICS_ADDR", default_value = "0.0.0.0:8081")]
    metrics_addr: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting DVFS Gateway");
    info!("  Node config: {}", args.config);
    info!("  Gateway address: {}", args.listen);
    info!("  Metrics address: {}", args.metrics_addr);

    // A missing or malformed node list degrades to an empty pool; the
    // process stays up and serves metadata reads.
    let config = match PoolConfig::load(&args.config) {
        Ok(config) => {
            info!(
                "Loaded {} storage nodes, probe interval {:?}",
                config.nodes.len(),
                config.health_check_interval()
            );
            config
        }
        Err(e) => {
            warn!("Node configuration unavailable, starting with an empty pool: {}", e);
            PoolConfig::empty()
        }
    };

    let pool = NodePool::from_config(&config)?;
    pool.initialize().await;

    let state = Arc::new(AppState {
        pool: Arc::clone(&pool),
        store: Arc::new(InMemoryMetadataStore::new()),
    });

    // Start metrics server
    let metrics_addr = args.metrics_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = run_metrics_server(&metrics_addr).await {
            error!("Metrics server error: {}", e);
        }
    });

    // Run the gateway
    gateway::run(&args.listen, state).await?;

    info!("Gateway shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

// =============================================================================
// Metrics Server
// =============================================================================

async fn run_metrics_server(addr: &str) -> Result<()> {
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::{Request, Response, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    async fn metrics_handler(
        req: Request<hyper::body::Incoming>,
    ) -> std::result::Result<Response<Full<Bytes>>, std::convert::Infallible> {
        let response = match req.uri().path() {
            "/metrics" => {
                let (buffer, content_type) = metrics::gather_text();
                Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", content_type)
                    .body(Full::new(Bytes::from(buffer)))
                    .unwrap()
            }
            "/healthz" | "/livez" => Response::builder()
                .status(StatusCode::OK)
                .body(Full::new(Bytes::from("ok")))
                .unwrap(),
            _ => Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::from("not found")))
                .unwrap(),
        };
        Ok(response)
    }

    let addr: SocketAddr = addr.parse().map_err(|e| {
        dvfs_gateway::Error::Internal(format!("Invalid metrics server address: {}", e))
    })?;

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        dvfs_gateway::Error::Internal(format!("Failed to bind metrics server: {}", e))
    })?;

    info!("Metrics server listening on {}", addr);

    loop {
        let (stream, _) = listener.accept().await.map_err(|e| {
            dvfs_gateway::Error::Internal(format!("Metrics server accept error: {}", e))
        })?;

        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(metrics_handler))
                .await
            {
                tracing::error!("Metrics server connection error: {}", e);
            }
        });
    }
}
