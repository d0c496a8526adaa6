//! End-to-end tests for the consensus approval gate
//!
//! Drives the full record -> count -> gate pipeline through the HTTP API
//! with 16+ raters per video and checks the resulting approval state.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;
use vesp_common::db::init_database;
use vesp_ui::{build_router, AppState};

async fn setup() -> (axum::Router, SqlitePool, TempDir) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("vesp.db"))
        .await
        .expect("Should initialize test database");
    let app = build_router(AppState::new(pool.clone()));
    (app, pool, dir)
}

async fn seed_users(pool: &SqlitePool, n: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = sqlx::query("INSERT INTO users (username, password, created_at) VALUES (?, 'x', ?)")
            .bind(format!("rater{i}"))
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid();
        ids.push(id);
    }
    ids
}

async fn insert_video(pool: &SqlitePool, rvm_valence: f64, rvm_arousal: f64) -> i64 {
    sqlx::query("INSERT INTO videos (title, src, rvm_valence, rvm_arousal) VALUES ('Gate test', 'videos/gate.mp4', ?, ?)")
        .bind(rvm_valence)
        .bind(rvm_arousal)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn submit(
    app: &axum::Router,
    user_id: i64,
    video_id: i64,
    valence: f64,
    arousal: f64,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/submit-rating")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "user_id": user_id,
                "video_id": video_id,
                "sam_valence": valence,
                "sam_arousal": arousal
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn video_state(pool: &SqlitePool, video_id: i64) -> (i64, bool) {
    sqlx::query_as("SELECT rating_count, is_approved FROM videos WHERE id = ?")
        .bind(video_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// 16 raters agreeing in direction with the RVM score at low variance
/// approve the video on exactly the 16th rating, never before.
#[tokio::test]
async fn test_approval_at_consensus_threshold() {
    let (app, pool, _dir) = setup().await;
    let users = seed_users(&pool, 16).await;
    // RVM pre-filter says high valence, low arousal
    let video_id = insert_video(&pool, 7.0, 3.0).await;

    for (i, user_id) in users.iter().enumerate() {
        // valence alternates 6/7 (mean 6.5), arousal 2.5/3.1 (mean 2.8); variance well below 4
        let valence = if i % 2 == 0 { 6.0 } else { 7.0 };
        let arousal = if i % 2 == 0 { 2.5 } else { 3.1 };

        let (status, body) = submit(&app, *user_id, video_id, valence, arousal).await;
        assert_eq!(status, StatusCode::OK);

        let (rating_count, is_approved) = video_state(&pool, video_id).await;
        assert_eq!(rating_count, i as i64 + 1);

        if i < 15 {
            // Below the threshold the gate must not fire
            assert!(!is_approved, "approved early at rating {}", i + 1);
            assert_eq!(body["approved"], false);
        } else {
            assert!(is_approved, "not approved at the consensus threshold");
            assert_eq!(body["approved"], true);
        }
    }

    // Counter stayed in sync with the actual rows throughout
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_ratings WHERE video_id = ?")
        .bind(video_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 16);
}

/// Directional agreement with high rater disagreement fails the variance gate,
/// and rating continues past the threshold on the unapproved video.
#[tokio::test]
async fn test_no_approval_with_high_variance() {
    let (app, pool, _dir) = setup().await;
    let users = seed_users(&pool, 17).await;
    let video_id = insert_video(&pool, 7.0, 3.0).await;

    for (i, user_id) in users.iter().take(16).enumerate() {
        // valence alternates 4/9: mean 6.5 agrees with RVM, sample variance ≈ 6.7
        let valence = if i % 2 == 0 { 4.0 } else { 9.0 };
        let (status, _) = submit(&app, *user_id, video_id, valence, 2.8).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (rating_count, is_approved) = video_state(&pool, video_id).await;
    assert_eq!(rating_count, 16);
    assert!(!is_approved, "variance gate should have failed");

    // No final cutoff: a 17th rating is accepted and the gate re-runs
    let (status, body) = submit(&app, users[16], video_id, 6.5, 2.8).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approved"], false);

    let (rating_count, is_approved) = video_state(&pool, video_id).await;
    assert_eq!(rating_count, 17);
    assert!(!is_approved);
}

/// The rater mean landing on the other side of neutral from the RVM score
/// fails the sign-agreement gate even at minimal variance.
#[tokio::test]
async fn test_no_approval_on_sign_disagreement() {
    let (app, pool, _dir) = setup().await;
    let users = seed_users(&pool, 16).await;
    let video_id = insert_video(&pool, 7.0, 3.0).await;

    for user_id in &users {
        // raters place valence below neutral while RVM is above
        let (status, _) = submit(&app, *user_id, video_id, 4.0, 2.8).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (rating_count, is_approved) = video_state(&pool, video_id).await;
    assert_eq!(rating_count, 16);
    assert!(!is_approved);
}

/// Sign agreement is evaluated per dimension: valence consensus cannot
/// compensate for an arousal disagreement.
#[tokio::test]
async fn test_sign_agreement_is_per_dimension() {
    let (app, pool, _dir) = setup().await;
    let users = seed_users(&pool, 16).await;
    let video_id = insert_video(&pool, 7.0, 3.0).await;

    for user_id in &users {
        // valence agrees (above neutral), arousal disagrees (above neutral vs RVM 3.0)
        let (status, _) = submit(&app, *user_id, video_id, 6.5, 7.0).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, is_approved) = video_state(&pool, video_id).await;
    assert!(!is_approved);
}

/// A video without RVM scores can accumulate ratings but never approves.
#[tokio::test]
async fn test_unscored_video_never_approves() {
    let (app, pool, _dir) = setup().await;
    let users = seed_users(&pool, 16).await;
    let video_id = sqlx::query("INSERT INTO videos (title, src) VALUES ('No RVM', 'videos/norvm.mp4')")
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

    for user_id in &users {
        let (status, _) = submit(&app, *user_id, video_id, 6.5, 2.8).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (rating_count, is_approved) = video_state(&pool, video_id).await;
    assert_eq!(rating_count, 16);
    assert!(!is_approved);
}

/// Once approved a video stays approved; later ratings cannot revert it,
/// and it shows up in the approved-videos feed.
#[tokio::test]
async fn test_approval_is_monotonic() {
    let (app, pool, _dir) = setup().await;
    let users = seed_users(&pool, 17).await;
    let video_id = insert_video(&pool, 7.0, 3.0).await;

    for user_id in users.iter().take(16) {
        let (status, _) = submit(&app, *user_id, video_id, 6.5, 2.8).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, is_approved) = video_state(&pool, video_id).await;
    assert!(is_approved);

    // A wildly disagreeing 17th rating does not revoke approval
    let (status, body) = submit(&app, users[16], video_id, 1.0, 9.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approved"], true);

    let (_, is_approved) = video_state(&pool, video_id).await;
    assert!(is_approved);

    // Approved feed now contains the video
    let request = Request::builder()
        .method("GET")
        .uri("/api/approved-videos")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v["id"].as_i64() == Some(video_id)));
}
