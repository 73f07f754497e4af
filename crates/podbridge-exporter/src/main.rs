//! podbridge exporter
//!
//! - Runs the producer script every interval and converts its JSON output
//! - Publishes the result as exposition text (atomic file replace)
//! - Serves the latest snapshot on GET /metrics
//!
//! Usage: `podbridge-exporter [config.yaml]` (default `podbridge.yaml`).

use std::process::ExitCode;

use podbridge_core::error::Result;
use podbridge_exporter::{app_state::AppState, config, obs, router};

const DEFAULT_CONFIG: &str = "podbridge.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("podbridge-exporter: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let (cfg, defaulted) = config::load_or_default(&path)?;
    obs::logging::init(&cfg.logging)?;
    if defaulted {
        tracing::info!(%path, "config file not found, using defaults");
    }

    let listen = cfg.server.listen_addr()?;
    let state = AppState::new(cfg);
    if state.store().exists().await {
        tracing::info!(
            path = %state.store().path().display(),
            "serving existing snapshot until first cycle"
        );
    }

    let collector = state.collector().spawn();

    let app = router::build_router(state);
    tracing::info!(%listen, "podbridge-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| podbridge_core::BridgeError::Internal(format!("bind {listen} failed: {e}")))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    collector.stop().await;

    served.map_err(|e| podbridge_core::BridgeError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
