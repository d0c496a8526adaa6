//! Sample video seed data
//!
//! A fresh database gets six sample videos spanning the four
//! valence/arousal quadrants so the rating task works out of the box.
//! Only runs when the videos table is empty.

use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// (title, src, rvm_valence, rvm_arousal)
const SAMPLE_VIDEOS: &[(&str, &str, f64, f64)] = &[
    ("Video 1", "videos/video1.mp4", 2.5, 2.5),
    ("Video 2", "videos/video2.mp4", 7.5, 7.5),
    ("Video 3", "videos/video3.mp4", 7.5, 2.5),
    ("Video 4", "videos/video4.mp4", 2.5, 7.5),
    ("Video 5", "videos/video5.mp4", 2.5, 2.5),
    ("Video 6", "videos/video6.mp4", 7.5, 7.5),
];

/// Insert sample videos when the table is empty
pub async fn seed_sample_videos(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    for (title, src, rvm_valence, rvm_arousal) in SAMPLE_VIDEOS {
        sqlx::query(
            "INSERT INTO videos (title, src, rvm_valence, rvm_arousal) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(src)
        .bind(rvm_valence)
        .bind(rvm_arousal)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} sample videos", SAMPLE_VIDEOS.len());
    Ok(())
}
