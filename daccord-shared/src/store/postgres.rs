/// PostgreSQL-backed store
///
/// Thin delegation to the row models. The only logic here is mapping
/// `None`/`false` results from ownership-scoped queries and classifying
/// constraint violations through `From<sqlx::Error> for StoreError`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    Activity, ActivityWithUser, Community, CommunityMember, CreateActivity, CreateCommunity,
    CreateCommunityMember, CreatePlaylist, CreateTrack, CreateUser, MemberProfile, Playlist,
    PlaylistEntry, PlaylistWithTracks, Track, UpdatePlaylist, User,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn list_members(&self, limit: Option<i64>) -> StoreResult<Vec<MemberProfile>> {
        Ok(User::list_profiles(&self.pool, limit).await?)
    }

    async fn create_community(&self, data: CreateCommunity) -> StoreResult<Community> {
        Ok(Community::create(&self.pool, data).await?)
    }

    async fn find_community(&self, id: Uuid) -> StoreResult<Option<Community>> {
        Ok(Community::find_by_id(&self.pool, id).await?)
    }

    async fn list_communities(&self) -> StoreResult<Vec<Community>> {
        Ok(Community::list(&self.pool).await?)
    }

    async fn list_communities_by_category(&self, category: &str) -> StoreResult<Vec<Community>> {
        Ok(Community::list_by_category(&self.pool, category).await?)
    }

    async fn popular_communities(&self, limit: i64) -> StoreResult<Vec<Community>> {
        Ok(Community::list_popular(&self.pool, limit).await?)
    }

    async fn join_community(&self, data: CreateCommunityMember) -> StoreResult<CommunityMember> {
        Ok(CommunityMember::join(&self.pool, data).await?)
    }

    async fn create_track(&self, data: CreateTrack) -> StoreResult<Track> {
        Ok(Track::create(&self.pool, data).await?)
    }

    async fn list_tracks(&self, limit: i64) -> StoreResult<Vec<Track>> {
        Ok(Track::list(&self.pool, limit).await?)
    }

    async fn create_playlist(&self, data: CreatePlaylist) -> StoreResult<Playlist> {
        Ok(Playlist::create(&self.pool, data).await?)
    }

    async fn list_playlists(&self, owner_id: Uuid) -> StoreResult<Vec<Playlist>> {
        Ok(Playlist::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn find_playlist(
        &self,
        id: Uuid,
        viewer_id: Uuid,
    ) -> StoreResult<Option<PlaylistWithTracks>> {
        let playlist = match Playlist::find_by_id(&self.pool, id).await? {
            Some(p) if p.visible_to(viewer_id) => p,
            _ => return Ok(None),
        };

        let tracks = Playlist::entries(&self.pool, playlist.id).await?;
        Ok(Some(PlaylistWithTracks { playlist, tracks }))
    }

    async fn update_playlist(
        &self,
        id: Uuid,
        owner_id: Uuid,
        data: UpdatePlaylist,
    ) -> StoreResult<Option<Playlist>> {
        Ok(Playlist::update(&self.pool, id, owner_id, data).await?)
    }

    async fn delete_playlist(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        Ok(Playlist::delete(&self.pool, id, owner_id).await?)
    }

    async fn add_playlist_track(
        &self,
        playlist_id: Uuid,
        owner_id: Uuid,
        track_id: Uuid,
    ) -> StoreResult<PlaylistEntry> {
        match Playlist::find_by_id(&self.pool, playlist_id).await? {
            Some(p) if p.user_id == owner_id => {}
            _ => return Err(StoreError::NotFound("playlist".to_string())),
        }

        let track = Track::find_by_id(&self.pool, track_id)
            .await?
            .ok_or_else(|| StoreError::NotFound("track".to_string()))?;

        let (position, added_at) = Playlist::append_track(&self.pool, playlist_id, track_id).await?;

        Ok(PlaylistEntry {
            playlist_id,
            position,
            added_at,
            track,
        })
    }

    async fn create_activity(&self, data: CreateActivity) -> StoreResult<Activity> {
        Ok(Activity::create(&self.pool, data).await?)
    }

    async fn activity_feed(&self, limit: i64) -> StoreResult<Vec<ActivityWithUser>> {
        Ok(Activity::feed(&self.pool, limit).await?)
    }
}
