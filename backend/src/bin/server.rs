//! Queue Status HTTP Server Binary
//!
//! This is the main entry point for the queue status REST API server.
//! It loads the configuration, initializes the repository, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the built-in defaults (empty local repository)
//! cargo run --bin qstatus-server
//!
//! # Run against an MSB catalog
//! QSTATUS_CONFIG=./qstatus.toml cargo run --bin qstatus-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `QSTATUS_CONFIG`: Path to the TOML configuration file
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use omp_qstatus::config::AppConfig;
use omp_qstatus::db::RepositoryFactory;
use omp_qstatus::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting queue status server");

    let config = AppConfig::load()?;
    let repository = RepositoryFactory::from_config(&config)?;
    info!(
        "Repository initialized, telescopes: {}",
        config.sites.telescopes().collect::<Vec<_>>().join(", ")
    );

    // Create application state
    let state = AppState::new(repository, config);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
