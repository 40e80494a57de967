/// Playlist model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE playlists (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     is_public BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE playlist_tracks (
///     playlist_id UUID NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
///     track_id UUID NOT NULL REFERENCES music_tracks(id) ON DELETE CASCADE,
///     position INTEGER NOT NULL CHECK (position >= 0),
///     added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (playlist_id, track_id),
///     UNIQUE (playlist_id, position)
/// );
/// ```
///
/// # Ownership
///
/// Every mutating query is scoped by `user_id` in its `WHERE` clause. A
/// playlist owned by someone else is indistinguishable from a missing one:
/// both come back as `None` / `false`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::track::Track;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Playlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePlaylist {
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_public: bool,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// A track placed in a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub playlist_id: Uuid,
    pub position: i32,
    pub added_at: DateTime<Utc>,
    pub track: Track,
}

/// Playlist together with its tracks ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistWithTracks {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub tracks: Vec<PlaylistEntry>,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    playlist_id: Uuid,
    position: i32,
    added_at: DateTime<Utc>,
    #[sqlx(flatten)]
    track: Track,
}

impl From<EntryRow> for PlaylistEntry {
    fn from(row: EntryRow) -> Self {
        PlaylistEntry {
            playlist_id: row.playlist_id,
            position: row.position,
            added_at: row.added_at,
            track: row.track,
        }
    }
}

/// Unique constraint on `(playlist_id, position)`
pub const POSITION_CONSTRAINT: &str = "playlist_tracks_position_key";

const COLUMNS: &str = "id, user_id, name, description, is_public, created_at, updated_at";

impl Playlist {
    pub async fn create(pool: &PgPool, data: CreatePlaylist) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Playlist>(&format!(
            "INSERT INTO playlists (user_id, name, description, is_public) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.is_public)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Playlist>(&format!("SELECT {COLUMNS} FROM playlists WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Playlists owned by `user_id`, newest first
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {COLUMNS} FROM playlists WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Applies a partial update to a playlist owned by `owner_id`
    ///
    /// Returns `None` when no playlist with that id belongs to the owner.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdatePlaylist,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut bind_count = 2;

        if data.name.is_some() {
            bind_count += 1;
            sets.push(format!("name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${}", bind_count));
        }
        if data.is_public.is_some() {
            bind_count += 1;
            sets.push(format!("is_public = ${}", bind_count));
        }

        let query = format!(
            "UPDATE playlists SET {} WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Playlist>(&query).bind(id).bind(owner_id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(is_public) = data.is_public {
            q = q.bind(is_public);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a playlist owned by `owner_id`; `false` if nothing matched
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Tracks of a playlist ordered by position
    pub async fn entries(pool: &PgPool, playlist_id: Uuid) -> Result<Vec<PlaylistEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT pt.playlist_id, pt.position, pt.added_at,
                   t.id, t.user_id, t.title, t.artist, t.album, t.duration,
                   t.audio_url, t.cover_url, t.created_at
            FROM playlist_tracks pt
            JOIN music_tracks t ON t.id = pt.track_id
            WHERE pt.playlist_id = $1
            ORDER BY pt.position ASC
            "#,
        )
        .bind(playlist_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(PlaylistEntry::from).collect())
    }

    /// Appends a track after the current last position
    ///
    /// The caller must already have checked ownership of the playlist.
    /// Two concurrent appends can compute the same slot; the loser fails on
    /// [`POSITION_CONSTRAINT`] and may retry.
    ///
    /// # Errors
    ///
    /// - SQLSTATE `23505` if the track is already in the playlist, or the
    ///   slot was taken concurrently
    /// - SQLSTATE `23503` if the track or playlist does not exist
    pub async fn append_track(
        pool: &PgPool,
        playlist_id: Uuid,
        track_id: Uuid,
    ) -> Result<(i32, DateTime<Utc>), sqlx::Error> {
        sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            r#"
            INSERT INTO playlist_tracks (playlist_id, track_id, position)
            VALUES (
                $1,
                $2,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM playlist_tracks WHERE playlist_id = $1)
            )
            RETURNING position, added_at
            "#,
        )
        .bind(playlist_id)
        .bind(track_id)
        .fetch_one(pool)
        .await
    }

    /// Whether `user_id` may read this playlist
    pub fn visible_to(&self, user_id: Uuid) -> bool {
        self.is_public || self.user_id == user_id
    }
}
