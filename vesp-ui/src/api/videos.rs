//! Video selection feeds and aggregate statistics
//!
//! All feeds are unordered random samples (ORDER BY RANDOM()), matching how
//! the experiment front-end draws stimuli. The only per-user state is the
//! join-based "not already rated by this user" filter.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vesp_common::sam;

use crate::{api::ApiError, AppState};

/// Number of videos returned by the sampling feeds
const FEED_LIMIT: i64 = 5;

/// Default and maximum limits for the RVM-filtered feed
const RVM_DEFAULT_LIMIT: i64 = 10;
const RVM_MAX_LIMIT: i64 = 100;

/// Video with its pre-filter scores exposed as valence/arousal
#[derive(Debug, Serialize, FromRow)]
pub struct ScoredVideo {
    pub id: i64,
    pub title: String,
    pub src: String,
    pub valence: Option<f64>,
    pub arousal: Option<f64>,
}

/// Video reference without scores (rating task must not bias raters)
#[derive(Debug, Serialize, FromRow)]
pub struct VideoRef {
    pub id: i64,
    pub title: String,
    pub src: String,
}

/// GET /api/videos
///
/// Random sample across all videos regardless of state (test-player feed).
pub async fn all_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScoredVideo>>, ApiError> {
    let rows: Vec<ScoredVideo> = sqlx::query_as(
        "SELECT id, title, src, rvm_valence AS valence, rvm_arousal AS arousal
         FROM videos ORDER BY RANDOM() LIMIT ?",
    )
    .bind(FEED_LIMIT)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// GET /api/approved-videos
///
/// Random sample of consensus-approved videos for experimental playback.
pub async fn approved_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScoredVideo>>, ApiError> {
    let rows: Vec<ScoredVideo> = sqlx::query_as(
        "SELECT id, title, src, rvm_valence AS valence, rvm_arousal AS arousal
         FROM videos
         WHERE is_approved = 1
         ORDER BY RANDOM() LIMIT ?",
    )
    .bind(FEED_LIMIT)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct UnratedQuery {
    pub user_id: Option<i64>,
}

/// GET /api/unrated-videos?user_id=
///
/// Random sample of videos the user has not rated yet and that are still
/// pending approval.
pub async fn unrated_videos(
    State(state): State<AppState>,
    Query(query): Query<UnratedQuery>,
) -> Result<Json<Vec<VideoRef>>, ApiError> {
    let Some(user_id) = query.user_id else {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    };

    let rows: Vec<VideoRef> = sqlx::query_as(
        "SELECT v.id, v.title, v.src
         FROM videos v
         LEFT JOIN user_ratings ur ON v.id = ur.video_id AND ur.user_id = ?
         WHERE ur.id IS NULL AND v.is_approved = 0
         ORDER BY RANDOM() LIMIT ?",
    )
    .bind(user_id)
    .bind(FEED_LIMIT)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct RvmFilteredQuery {
    pub limit: Option<i64>,
}

/// Video that passed the RVM pre-filter, pending human consensus
#[derive(Debug, Serialize, FromRow)]
pub struct RvmCandidate {
    pub id: i64,
    pub title: String,
    pub src: String,
    pub rvm_valence: f64,
    pub rvm_arousal: f64,
}

/// GET /api/rvm-filtered-videos?limit=
///
/// Videos with RVM scores passing the automated pre-filter that have not
/// yet cleared the SAM consensus gate.
pub async fn rvm_filtered_videos(
    State(state): State<AppState>,
    Query(query): Query<RvmFilteredQuery>,
) -> Result<Json<Vec<RvmCandidate>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(RVM_DEFAULT_LIMIT)
        .clamp(1, RVM_MAX_LIMIT);

    let rows: Vec<RvmCandidate> = sqlx::query_as(
        "SELECT id, title, src, rvm_valence, rvm_arousal
         FROM videos
         WHERE rvm_valence IS NOT NULL
           AND rvm_arousal IS NOT NULL
           AND (rvm_valence * rvm_valence + rvm_arousal * rvm_arousal) > ?
           AND (rating_count < ? OR is_approved = 0)
         ORDER BY RANDOM() LIMIT ?",
    )
    .bind(sam::RVM_PREFILTER_MIN)
    .bind(sam::CONSENSUS_THRESHOLD)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// Aggregate counts over the video screening pipeline
#[derive(Debug, Serialize)]
pub struct VideoStatsResponse {
    pub total: i64,
    pub approved: i64,
    /// Passed the RVM pre-filter, awaiting human consensus
    pub pending_consensus: i64,
    /// No RVM scores yet
    pub unscored: i64,
}

/// GET /api/video-stats
pub async fn video_stats(
    State(state): State<AppState>,
) -> Result<Json<VideoStatsResponse>, ApiError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(&state.db)
        .await?;

    let approved: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE is_approved = 1")
        .fetch_one(&state.db)
        .await?;

    let pending_consensus: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM videos
         WHERE rvm_valence IS NOT NULL
           AND rvm_arousal IS NOT NULL
           AND (rvm_valence * rvm_valence + rvm_arousal * rvm_arousal) > ?
           AND is_approved = 0",
    )
    .bind(sam::RVM_PREFILTER_MIN)
    .fetch_one(&state.db)
    .await?;

    let unscored: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM videos WHERE rvm_valence IS NULL OR rvm_arousal IS NULL",
    )
    .fetch_one(&state.db)
    .await?;

    Ok(Json(VideoStatsResponse {
        total,
        approved,
        pending_consensus,
        unscored,
    }))
}
