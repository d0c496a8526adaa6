//! vesp-ui library - web service for the Video Emotion Study Platform
//!
//! Serves the HTTP JSON API used by the experiment front-end: registration
//! and login, video feeds for the rating and playback tasks, SAM rating
//! submission with the consensus approval gate, and experiment bookkeeping.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/register", post(api::auth::register))
        .route("/api/login", post(api::auth::login))
        .route("/api/submit-rating", post(api::ratings::submit_rating))
        .route("/api/user-ratings", get(api::ratings::user_ratings))
        .route("/api/videos", get(api::videos::all_videos))
        .route("/api/approved-videos", get(api::videos::approved_videos))
        .route("/api/unrated-videos", get(api::videos::unrated_videos))
        .route("/api/rvm-filtered-videos", get(api::videos::rvm_filtered_videos))
        .route("/api/video-stats", get(api::videos::video_stats))
        .route("/api/record-video-time", post(api::views::record_video_time))
        .route("/api/experiments", post(api::experiments::create_experiment))
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
