//! relay-server entry point.
//!
//! Startup order:
//! 1. Load `.env` and parse the command line.
//! 2. Initialise tracing.
//! 3. Load and validate the relay configuration.
//! 4. Serve the router until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use relay_server::args::Cli;
use relay_server::state::AppState;
use relay_server::{routes, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be applied before clap reads RELAY_* defaults
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    telemetry::init_tracing(cli.log_json);
    info!(version = env!("CARGO_PKG_VERSION"), "relay-server starting");

    let config = relay_core::load_config(cli.config.as_deref())
        .context("failed to load relay configuration")?;
    info!(models = ?config.model_ids(), base_url = %config.base_url, "configuration loaded");

    let state = AppState::new(Arc::new(config)).context("failed to build upstream transport")?;
    let app = routes::build(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(addr = %cli.bind, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relay-server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
