//! Tests for database initialization, schema creation, and seed data

use tempfile::TempDir;
use vesp_common::db::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("vesp.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());

    // Verify database file was created
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("vesp.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Second open must succeed and not disturb the schema
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_sample_videos_seeded_once() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("vesp.db");

    let pool = init_database(&db_path).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 6, "Fresh database should hold 6 sample videos");

    // All samples start unrated and unapproved, with RVM scores present
    let unapproved: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM videos
         WHERE is_approved = 0 AND rating_count = 0
           AND rvm_valence IS NOT NULL AND rvm_arousal IS NOT NULL",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(unapproved, 6);

    drop(pool);

    // Re-initialization must not duplicate the seed rows
    let pool = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 6, "Seed must be idempotent");
}

#[tokio::test]
async fn test_duplicate_rating_rejected_by_schema() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("vesp.db");
    let pool = init_database(&db_path).await.unwrap();

    sqlx::query("INSERT INTO users (username, password, created_at) VALUES ('alice', 'x', '2026-01-01T00:00:00Z')")
        .execute(&pool)
        .await
        .unwrap();

    let insert = "INSERT INTO user_ratings (user_id, video_id, sam_valence, sam_arousal, created_at)
                  VALUES (1, 1, 6.0, 4.0, '2026-01-01T00:00:00Z')";
    sqlx::query(insert).execute(&pool).await.unwrap();

    // UNIQUE(user_id, video_id) rejects a second rating of the same video
    let second = sqlx::query(insert).execute(&pool).await;
    assert!(second.is_err());
}
