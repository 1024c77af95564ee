//! Environmental Aggregator (verdant-ea) - Main entry point
//!
//! Runs the periodic aggregation cycle and the HTTP surface for the sensor
//! and rendering collaborators.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verdant_common::config::VerdantConfig;
use verdant_ea::api::{self, AppState};
use verdant_ea::fetch::EnvironmentFetcher;
use verdant_ea::scheduler::CycleScheduler;
use verdant_ea::state::SharedState;
use verdant_ea::upload::UploadClient;

/// Command-line arguments for verdant-ea
#[derive(Parser, Debug)]
#[command(name = "verdant-ea")]
#[command(about = "Environmental aggregation and scoring service for Verdant")]
#[command(version)]
struct Args {
    /// Path to TOML config file (default: platform config directory)
    #[arg(short, long, env = "VERDANT_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "VERDANT_EA_PORT")]
    port: Option<u16>,

    /// Seconds between aggregation cycles (overrides config)
    #[arg(long)]
    cycle_period: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        VerdantConfig::load(args.config.as_ref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(period) = args.cycle_period {
        config.cycle_period_secs = period;
    }

    // Initialize tracing
    let default_filter = format!(
        "verdant_ea={level},verdant_common={level},tower_http=debug",
        level = config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Verdant Environmental Aggregator on port {}", config.port);
    info!(
        "Cycle period {}s, source timeout {}s",
        config.cycle_period_secs, config.source_timeout_secs
    );

    let state = Arc::new(SharedState::new());

    let fetcher = Arc::new(
        EnvironmentFetcher::with_default_sources(&config, state.noise.clone())
            .context("Failed to initialize environment fetcher")?,
    );

    let uploader = match &config.upload_endpoint {
        Some(endpoint) => {
            info!("Cycle upload enabled: {}", endpoint);
            let http = reqwest::Client::builder()
                .timeout(config.source_timeout())
                .build()
                .context("Failed to build upload HTTP client")?;
            Some(Arc::new(UploadClient::new(
                http,
                endpoint.clone(),
                config.device_id.clone(),
            )))
        }
        None => {
            info!("Cycle upload disabled (no endpoint configured)");
            None
        }
    };

    let scheduler = Arc::new(CycleScheduler::new(
        Arc::clone(&state),
        fetcher,
        uploader,
        config.cycle_period(),
    ));
    scheduler.start().await;

    let app = api::create_router(AppState {
        state,
        scheduler: Arc::clone(&scheduler),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // cancel the pending timer; an in-flight cycle completes within the
    // per-source timeout bound
    scheduler.stop().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
