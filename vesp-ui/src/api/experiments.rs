//! Experiment session records

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{api::ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateExperimentRequest {
    #[serde(default)]
    pub experiment_type: String,
    pub user_id: Option<i64>,
    /// Free-form session context captured at creation (stored as JSON text)
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CreateExperimentResponse {
    pub experiment_id: i64,
    pub message: String,
}

/// POST /api/experiments
///
/// Creates an experiment session record and returns its id.
pub async fn create_experiment(
    State(state): State<AppState>,
    Json(req): Json<CreateExperimentRequest>,
) -> Result<(StatusCode, Json<CreateExperimentResponse>), ApiError> {
    let experiment_type = req.experiment_type.trim();
    if experiment_type.is_empty() {
        return Err(ApiError::BadRequest(
            "Experiment type is required".to_string(),
        ));
    }

    let metadata = req.metadata.map(|m| m.to_string());

    let result = sqlx::query(
        "INSERT INTO experiments (experiment_type, user_id, metadata, created_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(experiment_type)
    .bind(req.user_id)
    .bind(&metadata)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    let experiment_id = result.last_insert_rowid();
    info!("Created experiment {} ({})", experiment_id, experiment_type);

    Ok((
        StatusCode::CREATED,
        Json(CreateExperimentResponse {
            experiment_id,
            message: "Experiment created successfully".to_string(),
        }),
    ))
}
