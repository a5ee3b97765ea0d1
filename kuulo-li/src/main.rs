//! kuulo-li - Lesson Ingest Microservice
//!
//! **Module Identity:**
//! - Name: kuulo-li (Lesson Ingest)
//! - Port: 5733
//!
//! Accepts batches of uploaded audio and subtitle files, reconstructs
//! audio/subtitle pairs by normalized-name matching, derives a transcript
//! from each subtitle, and persists the valid pairs as lesson records.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kuulo_li::AppState;

/// Command-line arguments for kuulo-li
#[derive(Parser, Debug)]
#[command(name = "kuulo-li")]
#[command(about = "Lesson Ingest microservice for Kuulo")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5733", env = "KUULO_LI_PORT")]
    port: u16,

    /// Root folder holding the database and media tree
    #[arg(short, long, env = "KUULO_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kuulo_li=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    info!("Starting kuulo-li (Lesson Ingest) on port {}", args.port);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve root folder: CLI -> environment -> config file -> OS default
    let cli_root = args.root_folder.as_ref().and_then(|p| p.to_str());
    let root_folder = kuulo_common::config::resolve_root_folder(cli_root, "KUULO_ROOT_FOLDER");
    info!("Root folder: {}", root_folder.display());

    kuulo_common::config::ensure_root_folder(&root_folder)
        .context("Failed to initialize root folder")?;

    // Open or create database
    let db_path = kuulo_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let db_pool = kuulo_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database connection established");

    // Create application state and router
    let state = AppState::new(db_pool, root_folder);
    let app = kuulo_li::build_router(state);

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

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
