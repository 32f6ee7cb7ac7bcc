//! # warden-api — Binary Entry Point
//!
//! Starts the axum HTTP server with both gates wired from the process
//! environment. Ships with [`RejectAllVerifier`]: open-access modes
//! (development, e2e-test, unconfigured provider) work as-is, while an
//! enforced deployment must embed the library with a real
//! [`warden_api::verifier::AccessVerifier`].

use std::sync::Arc;

use warden_api::verifier::RejectAllVerifier;
use warden_core::GateConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Snapshot configuration from the environment, once.
    let config = GateConfig::from_env();
    tracing::info!(?config, "gate configuration loaded");

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let app = warden_api::app(config, Arc::new(RejectAllVerifier));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("warden API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
