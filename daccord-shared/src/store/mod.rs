/// Storage seam between HTTP handlers and persistence
///
/// Handlers talk to an `Arc<dyn Store>`. Two backends exist:
///
/// - [`PgStore`]: PostgreSQL through the row models in [`crate::models`]
/// - [`MemoryStore`]: process-local tables behind one lock, for local
///   development and tests
///
/// Both backends give the same guarantees: duplicate usernames, emails,
/// memberships and playlist entries surface as [`StoreError::Conflict`];
/// references to rows that do not exist surface as [`StoreError::NotFound`];
/// joining a community inserts the membership and bumps the counter
/// atomically.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::models::{
    Activity, ActivityWithUser, Community, CommunityMember, CreateActivity, CreateCommunity,
    CreateCommunityMember, CreatePlaylist, CreateTrack, CreateUser, MemberProfile, Playlist,
    PlaylistEntry, PlaylistWithTracks, Track, UpdatePlaylist, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let classified = err.as_database_error().and_then(|db| {
            let detail = db.constraint().unwrap_or("constraint").to_string();
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => Some(StoreError::Conflict(detail)),
                Some(FOREIGN_KEY_VIOLATION) => Some(StoreError::NotFound(detail)),
                _ => None,
            }
        });

        classified.unwrap_or(StoreError::Database(err))
    }
}

/// Persistence operations needed by the API
///
/// Ownership-scoped operations take the caller's id and treat a row owned
/// by somebody else exactly like a missing row.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness probe for `/health`
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    // Users

    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Public profiles, newest first; `None` means no limit
    async fn list_members(&self, limit: Option<i64>) -> StoreResult<Vec<MemberProfile>>;

    // Communities

    async fn create_community(&self, data: CreateCommunity) -> StoreResult<Community>;

    async fn find_community(&self, id: Uuid) -> StoreResult<Option<Community>>;

    async fn list_communities(&self) -> StoreResult<Vec<Community>>;

    async fn list_communities_by_category(&self, category: &str) -> StoreResult<Vec<Community>>;

    async fn popular_communities(&self, limit: i64) -> StoreResult<Vec<Community>>;

    /// Inserts the membership and increments `member_count` as one unit
    async fn join_community(&self, data: CreateCommunityMember) -> StoreResult<CommunityMember>;

    // Music

    async fn create_track(&self, data: CreateTrack) -> StoreResult<Track>;

    async fn list_tracks(&self, limit: i64) -> StoreResult<Vec<Track>>;

    async fn create_playlist(&self, data: CreatePlaylist) -> StoreResult<Playlist>;

    async fn list_playlists(&self, owner_id: Uuid) -> StoreResult<Vec<Playlist>>;

    /// Playlist with entries if it exists and is visible to `viewer_id`
    async fn find_playlist(
        &self,
        id: Uuid,
        viewer_id: Uuid,
    ) -> StoreResult<Option<PlaylistWithTracks>>;

    async fn update_playlist(
        &self,
        id: Uuid,
        owner_id: Uuid,
        data: UpdatePlaylist,
    ) -> StoreResult<Option<Playlist>>;

    async fn delete_playlist(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool>;

    /// Appends a track to a playlist owned by `owner_id`
    async fn add_playlist_track(
        &self,
        playlist_id: Uuid,
        owner_id: Uuid,
        track_id: Uuid,
    ) -> StoreResult<PlaylistEntry>;

    // Activity feed

    async fn create_activity(&self, data: CreateActivity) -> StoreResult<Activity>;

    async fn activity_feed(&self, limit: i64) -> StoreResult<Vec<ActivityWithUser>>;
}
