//! kuulo-li library interface
//!
//! Exposes the application state, router construction, and the ingest
//! engine for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod storage;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved root folder holding the database and media tree
    pub root_folder: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last batch-level failure for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, root_folder: PathBuf) -> Self {
        Self {
            db,
            root_folder,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let media_dir = kuulo_common::config::media_root(&state.root_folder);

    Router::new()
        .merge(api::lesson_routes())
        .merge(api::language_routes())
        .merge(api::health_routes())
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
