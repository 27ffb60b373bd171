//! COG Overlay API Server
//!
//! Serves Cloud-Optimized GeoTIFFs as georeferenced map overlays with
//! pixel-accurate value queries.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use raster_engine::EngineConfig;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use overlay_api::config::ServiceConfig;
use overlay_api::state::AppState;

/// COG Overlay API Server
#[derive(Parser, Debug)]
#[command(name = "overlay-api")]
#[command(about = "Georeferenced COG overlays and pixel queries over HTTP")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "OVERLAY_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "OVERLAY_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// S3-compatible endpoint for friendly dataset paths
    #[arg(long, default_value = "http://localhost:9000", env = "AWS_S3_ENDPOINT")]
    storage_endpoint: String,

    /// Default bucket for friendly dataset paths
    #[arg(long, default_value = cog_source::DEFAULT_BUCKET, env = "R2_BUCKET")]
    bucket: String,

    /// Palette JSON file
    #[arg(long, env = "COG_PALETTE_FILE")]
    palette: Option<PathBuf>,

    /// Root directory for relative local paths
    #[arg(long, env = "COG_DATA_ROOT")]
    data_root: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting COG overlay API server");

    let config = ServiceConfig {
        storage_endpoint: args.storage_endpoint,
        bucket: args.bucket,
        palette_file: args.palette,
        data_root: args.data_root,
        engine: EngineConfig::from_env(),
    };
    info!(
        endpoint = %config.storage_endpoint,
        bucket = %config.bucket,
        display_crs = %config.engine.display_crs,
        canonical_lat = config.engine.bounds.canonical_lat,
        "Configuration loaded"
    );

    let state = Arc::new(AppState::new(config).context("Failed to initialize application state")?);
    let app = overlay_api::build_router(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("COG overlay API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
