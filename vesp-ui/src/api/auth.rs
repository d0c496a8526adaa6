//! Registration and login endpoints
//!
//! Passwords are stored as Argon2 PHC hashes. Login failures return a
//! single generic 401 message so the response does not reveal whether the
//! username exists.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use vesp_common::auth::{hash_password, verify_password};
use vesp_common::db::User;

use crate::{api::ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user row (no password hash)
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserInfo,
}

/// POST /api/register
///
/// Creates a user account. 409 when the username is taken, 400 when either
/// field is missing or blank.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let result = sqlx::query(
        "INSERT INTO users (username, password, created_at) VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(&password_hash)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    let id = result.last_insert_rowid();
    info!("Registered user '{}' (id {})", username, id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: UserInfo {
                id,
                username: username.to_string(),
            },
        }),
    ))
}

/// POST /api/login
///
/// Verifies credentials. No token is issued; session state lives in the
/// client.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, password, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(&state.db)
    .await?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    if !verify_password(&req.password, &user.password)? {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserInfo {
            id: user.id,
            username: user.username,
        },
    }))
}
