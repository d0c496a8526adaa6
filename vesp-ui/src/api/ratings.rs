//! SAM rating submission and rating history
//!
//! Rating submission runs the record -> count -> consensus-gate pipeline
//! inside a single transaction, so the rating row, the counter, and the
//! approval flag can never drift apart under partial failure or racing
//! submissions.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;
use vesp_common::db::{UserRating, Video};
use vesp_common::sam::{self, RatingStats};

use crate::{api::ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub user_id: i64,
    pub video_id: i64,
    pub sam_valence: f64,
    pub sam_arousal: f64,
}

#[derive(Debug, Serialize)]
pub struct SubmitRatingResponse {
    pub message: String,
    /// Approval state of the video after this submission
    pub approved: bool,
}

/// POST /api/submit-rating
///
/// Records one SAM rating, increments the video's rating counter, and once
/// the counter reaches the consensus threshold evaluates the approval gate
/// over all ratings for the video. The gate re-runs on every submission at
/// or past the threshold; approval is monotonic.
pub async fn submit_rating(
    State(state): State<AppState>,
    Json(req): Json<SubmitRatingRequest>,
) -> Result<Json<SubmitRatingResponse>, ApiError> {
    if !sam::is_valid_sam_score(req.sam_valence) || !sam::is_valid_sam_score(req.sam_arousal) {
        return Err(ApiError::BadRequest(format!(
            "SAM scores must be between {} and {}",
            sam::SAM_MIN,
            sam::SAM_MAX
        )));
    }

    let mut tx = state.db.begin().await?;

    let user_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(req.user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user_exists.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let video: Option<Video> = sqlx::query_as(
        "SELECT id, title, src, rvm_valence, rvm_arousal, rating_count, is_approved
         FROM videos WHERE id = ?",
    )
    .bind(req.video_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(video) = video else {
        return Err(ApiError::NotFound("Video not found".to_string()));
    };

    let duplicate: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM user_ratings WHERE user_id = ? AND video_id = ?",
    )
    .bind(req.user_id)
    .bind(req.video_id)
    .fetch_optional(&mut *tx)
    .await?;
    if duplicate.is_some() {
        return Err(ApiError::Conflict(
            "User has already rated this video".to_string(),
        ));
    }

    // Rating recorder
    sqlx::query(
        "INSERT INTO user_ratings (user_id, video_id, sam_valence, sam_arousal, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(req.user_id)
    .bind(req.video_id)
    .bind(req.sam_valence)
    .bind(req.sam_arousal)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE videos SET rating_count = rating_count + 1 WHERE id = ?")
        .bind(req.video_id)
        .execute(&mut *tx)
        .await?;

    // Threshold checker: below the threshold no aggregate query runs
    let rating_count: i64 = sqlx::query_scalar("SELECT rating_count FROM videos WHERE id = ?")
        .bind(req.video_id)
        .fetch_one(&mut *tx)
        .await?;

    let mut approved = video.is_approved;
    if rating_count >= sam::CONSENSUS_THRESHOLD && !video.is_approved {
        let ratings: Vec<UserRating> = sqlx::query_as(
            "SELECT id, user_id, video_id, sam_valence, sam_arousal, created_at
             FROM user_ratings WHERE video_id = ?",
        )
        .bind(req.video_id)
        .fetch_all(&mut *tx)
        .await?;

        let samples: Vec<(f64, f64)> = ratings
            .iter()
            .map(|r| (r.sam_valence, r.sam_arousal))
            .collect();

        if let Some(stats) = RatingStats::from_samples(&samples) {
            if sam::approval_gate(video.rvm_valence, video.rvm_arousal, &stats) {
                // Approval writer; the WHERE guard keeps approval monotonic
                sqlx::query("UPDATE videos SET is_approved = 1 WHERE id = ? AND is_approved = 0")
                    .bind(req.video_id)
                    .execute(&mut *tx)
                    .await?;
                approved = true;
                info!(
                    "Video {} approved after {} ratings (mean v={:.2} a={:.2}, var v={:.2} a={:.2})",
                    req.video_id,
                    stats.count,
                    stats.mean_valence,
                    stats.mean_arousal,
                    stats.var_valence,
                    stats.var_arousal
                );
            }
        }
    }

    tx.commit().await?;

    Ok(Json(SubmitRatingResponse {
        message: "Rating submitted successfully".to_string(),
        approved,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UserRatingsQuery {
    pub user_id: Option<i64>,
}

/// One row of a user's rating history
#[derive(Debug, Serialize, FromRow)]
pub struct RatingHistoryEntry {
    pub id: i64,
    pub video_title: String,
    pub sam_valence: f64,
    pub sam_arousal: f64,
    pub rating_date: String,
}

/// GET /api/user-ratings?user_id=
///
/// Rating history joined with video titles, newest first.
pub async fn user_ratings(
    State(state): State<AppState>,
    Query(query): Query<UserRatingsQuery>,
) -> Result<Json<Vec<RatingHistoryEntry>>, ApiError> {
    let Some(user_id) = query.user_id else {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    };

    let rows: Vec<RatingHistoryEntry> = sqlx::query_as(
        "SELECT ur.id, v.title AS video_title, ur.sam_valence, ur.sam_arousal,
                ur.created_at AS rating_date
         FROM user_ratings ur
         JOIN videos v ON ur.video_id = v.id
         WHERE ur.user_id = ?
         ORDER BY ur.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}
