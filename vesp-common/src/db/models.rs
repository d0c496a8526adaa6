//! Database models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC hash string, never the plaintext
    pub password: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub src: String,
    /// RVM pre-filter scores, absent until the pre-filter has run
    pub rvm_valence: Option<f64>,
    pub rvm_arousal: Option<f64>,
    pub rating_count: i64,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRating {
    pub id: i64,
    pub user_id: i64,
    pub video_id: i64,
    pub sam_valence: f64,
    pub sam_arousal: f64,
    pub created_at: String,
}
