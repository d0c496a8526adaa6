//! vesp-ui - Video Emotion Study Platform web service
//!
//! Single-binary HTTP JSON API backing the browser experiment front-end.
//! Startup sequence: tracing, build identification, root folder resolution,
//! database initialization (schema + seed), then the axum server.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use vesp_common::config;
use vesp_ui::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "vesp-ui", about = "Video Emotion Study Platform web service")]
struct Args {
    /// Root folder holding the database (overrides env and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5730, env = "VESP_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting VESP web service (vesp-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Resolve root folder and make sure it exists
    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    // Open or create database (schema + sample videos)
    let pool = vesp_common::db::init_database(&db_path).await?;
    info!("✓ Database ready");

    // Create application state and router
    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((args.bind.as_str(), args.port)).await?;
    info!("vesp-ui listening on http://{}:{}", args.bind, args.port);
    info!("Health check: http://{}:{}/health", args.bind, args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
