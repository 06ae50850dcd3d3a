//! Wavetrix API Server
//!
//! HTTP API server exposing login/logout and the Fibonacci swing analysis
//! endpoint. Analysis state is per-request; only sessions and the series
//! cache live across requests.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use wavetrix::config::Config;
use wavetrix::core::http::{start_server, AppState};
use wavetrix::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env();
    let env = wavetrix::config::get_environment();
    info!("Starting Wavetrix API Server");
    info!(environment = %env, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    let state = AppState::from_config(&config)?;
    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
