//! Solver Gateway - upload proxy and offline asset cache
//!
//! This daemon hides the solver backend behind a single upload route and
//! keeps an offline snapshot store of the web app's assets warm.

mod config;
mod offline;
mod proxy;
mod server;

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::GatewayConfig;
use offline::{HttpBoundary, OfflineCacheManager};
use proxy::{BackendClient, UploadForwarder};
use server::AppState;

/// CLI command
#[derive(Debug)]
enum Command {
    /// Serve the HTTP surface (default)
    Serve,
    /// Warm the offline store once and exit (CLI mode)
    Warm,
    /// Show help
    Help,
}

fn print_help() {
    eprintln!(
        r#"Solver Gateway - upload proxy and offline asset cache

USAGE:
    solver-gateway           # Serve the upload route (default)
    solver-gateway warm
    solver-gateway help

COMMANDS:
    (none)  Serve the HTTP surface and warm the offline store in the background
    warm    Run one offline store warm-up pass and exit (CLI mode)
    help    Show this help message

ENVIRONMENT:
    BACKEND_URL      Origin of the solver backend (uploads rejected if unset)
    LISTEN_ADDR      HTTP listen address (default 127.0.0.1:8080)
    PAGE_ORIGIN      Origin for offline asset resolution (default http://localhost:3000)
    RUST_LOG         Log level (trace, debug, info, warn, error)
"#
    );
}

fn parse_args() -> Command {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        return Command::Serve;
    }

    match args[1].as_str() {
        "warm" => Command::Warm,
        "help" | "--help" | "-h" => Command::Help,
        other => {
            eprintln!("Unknown command: {}", other);
            Command::Help
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let log_level = env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let command = parse_args();

    let config = GatewayConfig::from_env()?;

    match command {
        Command::Serve => {
            if config.backend_url.is_none() {
                warn!("BACKEND_URL is not set; uploads will be answered with a configuration error");
            }

            let forwarder = Arc::new(UploadForwarder::new(
                config.backend_url.clone(),
                BackendClient::new()?,
            ));

            let boundary = HttpBoundary::new(config.page_origin.clone())?;
            let offline = Arc::new(OfflineCacheManager::new(boundary, config.page_origin.clone()));

            // Warm the store in the background; every failure in there is
            // per-asset and logged, never fatal.
            let warmup = Arc::clone(&offline);
            tokio::spawn(async move {
                warmup.activate().await;
            });

            let app = server::router(AppState { forwarder });
            let listener = TcpListener::bind(config.listen_addr)
                .await
                .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

            info!(addr = %config.listen_addr, "Gateway listening");

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!(error = %e, "Failed to listen for shutdown signal");
                    }
                })
                .await?;

            offline.log_metrics();
            info!("Shutdown complete.");
        }
        Command::Warm => {
            let boundary = HttpBoundary::new(config.page_origin.clone())?;
            let offline = OfflineCacheManager::new(boundary, config.page_origin.clone());

            let stored = offline.activate().await;
            println!("Warmed {} of {} assets.", stored, offline::PRELOAD_ASSETS.len());
        }
        Command::Help => {
            print_help();
        }
    }

    Ok(())
}
