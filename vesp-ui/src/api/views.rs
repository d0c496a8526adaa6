//! Playback interval telemetry

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{api::ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    pub user_id: i64,
    pub video_id: i64,
    /// Interval watched, in seconds from the start of the video
    pub started_at: f64,
    pub ended_at: f64,
}

#[derive(Debug, Serialize)]
pub struct RecordViewResponse {
    pub message: String,
}

/// POST /api/record-video-time
///
/// Stores the interval of a video a participant actually watched.
pub async fn record_video_time(
    State(state): State<AppState>,
    Json(req): Json<RecordViewRequest>,
) -> Result<Json<RecordViewResponse>, ApiError> {
    if !req.started_at.is_finite()
        || !req.ended_at.is_finite()
        || req.started_at < 0.0
        || req.ended_at < req.started_at
    {
        return Err(ApiError::BadRequest(
            "Invalid playback interval".to_string(),
        ));
    }

    let user_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(req.user_id)
        .fetch_optional(&state.db)
        .await?;
    if user_exists.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let video_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM videos WHERE id = ?")
        .bind(req.video_id)
        .fetch_optional(&state.db)
        .await?;
    if video_exists.is_none() {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    sqlx::query(
        "INSERT INTO video_views (user_id, video_id, started_at, ended_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(req.user_id)
    .bind(req.video_id)
    .bind(req.started_at)
    .bind(req.ended_at)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    Ok(Json(RecordViewResponse {
        message: "Video time recorded successfully".to_string(),
    }))
}
