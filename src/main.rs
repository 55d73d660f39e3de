//! # TMDb Gateway - Main Entry Point
//!
//! Startup sequence: initialize tracing, load configuration from the
//! environment, construct the server, then serve until SIGTERM/SIGINT.

use tokio::signal;
use tracing::{error, info};

use tmdb_gateway::{GatewayConfig, GatewayResult, GatewayServer};

#[tokio::main]
async fn main() -> GatewayResult<()> {
    init_tracing();

    info!("🚀 Starting TMDb gateway");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = GatewayConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let server = GatewayServer::new(&config)?;
    info!(
        "📦 Cache TTL {}, favorites at {}",
        humantime::format_duration(config.cache.ttl),
        config.favorites.path.display()
    );

    server.start(shutdown_signal()).await?;

    info!("✅ Gateway shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with an env-filterable format layer
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tmdb_gateway=info,tower_http=debug".into()),
        )
        .init();
}

/// Resolve when SIGTERM or SIGINT is received
async fn shutdown_signal() {
    let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(sig) => sig,
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("📡 Received SIGTERM, shutting down");
        }
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for SIGINT: {}", e);
            } else {
                info!("📡 Received SIGINT, shutting down");
            }
        }
    }
}
