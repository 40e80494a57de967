/// Music track model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE music_tracks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     artist VARCHAR(200) NOT NULL,
///     album VARCHAR(200),
///     duration INTEGER NOT NULL CHECK (duration > 0),
///     audio_url VARCHAR(512),
///     cover_url VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Default page size for track listings
pub const DEFAULT_TRACK_LIMIT: i64 = 50;

/// Upper bound on a single track listing
pub const MAX_TRACK_LIMIT: i64 = 100;

/// Clamps a requested page size into `1..=MAX_TRACK_LIMIT`
pub fn clamp_track_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_TRACK_LIMIT)
        .clamp(1, MAX_TRACK_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    pub id: Uuid,

    /// Uploader
    pub user_id: Uuid,

    pub title: String,

    pub artist: String,

    pub album: Option<String>,

    /// Length in seconds
    pub duration: i32,

    pub audio_url: Option<String>,

    pub cover_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTrack {
    pub user_id: Uuid,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: i32,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
}

impl Track {
    pub async fn create(pool: &PgPool, data: CreateTrack) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO music_tracks (user_id, title, artist, album, duration, audio_url, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, title, artist, album, duration, audio_url, cover_url, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.artist)
        .bind(data.album)
        .bind(data.duration)
        .bind(data.audio_url)
        .bind(data.cover_url)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Track>(
            r#"
            SELECT id, user_id, title, artist, album, duration, audio_url, cover_url, created_at
            FROM music_tracks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Newest tracks first
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Track>(
            r#"
            SELECT id, user_id, title, artist, album, duration, audio_url, cover_url, created_at
            FROM music_tracks
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
