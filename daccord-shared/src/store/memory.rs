/// In-memory store
///
/// All tables sit behind a single `tokio::sync::RwLock`. Every write takes
/// the write lock for its whole check-then-insert sequence, which gives the
/// same uniqueness, foreign-key and join atomicity behaviour as the Postgres
/// constraints. Rows are kept in insertion order, so "newest first" is a
/// reverse scan.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::user::handle_for;
use crate::models::{
    Activity, ActivityUser, ActivityWithUser, Community, CommunityMember, CreateActivity,
    CreateCommunity, CreateCommunityMember, CreatePlaylist, CreateTrack, CreateUser,
    MemberProfile, Playlist, PlaylistEntry, PlaylistWithTracks, Track, UpdatePlaylist, User,
    UserRole,
};

struct PlaylistTrackRow {
    playlist_id: Uuid,
    track_id: Uuid,
    position: i32,
    added_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    usernames: HashSet<String>,
    emails: HashSet<String>,
    communities: Vec<Community>,
    members: Vec<CommunityMember>,
    tracks: Vec<Track>,
    playlists: Vec<Playlist>,
    playlist_tracks: Vec<PlaylistTrackRow>,
    activities: Vec<Activity>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn require_user(&self, id: Uuid) -> StoreResult<()> {
        self.user(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound("user".to_string()))
    }

    fn require_community(&self, id: Uuid) -> StoreResult<()> {
        if self.communities.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound("community".to_string()))
        }
    }

    fn entries(&self, playlist_id: Uuid) -> Vec<PlaylistEntry> {
        let mut entries: Vec<PlaylistEntry> = self
            .playlist_tracks
            .iter()
            .filter(|row| row.playlist_id == playlist_id)
            .filter_map(|row| {
                let track = self.tracks.iter().find(|t| t.id == row.track_id)?;
                Some(PlaylistEntry {
                    playlist_id,
                    position: row.position,
                    added_at: row.added_at,
                    track: track.clone(),
                })
            })
            .collect();

        entries.sort_by_key(|e| e.position);
        entries
    }
}

/// Process-local [`Store`] for development and tests
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest-first view of a table kept in insertion order
fn newest_first<T: Clone>(rows: &[T]) -> Vec<T> {
    rows.iter().rev().cloned().collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.usernames.contains(&data.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }
        if tables.emails.contains(&data.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            handle: handle_for(&data.username),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            display_name: data.display_name,
            avatar_url: None,
            role: UserRole::Member,
            created_at: now,
            updated_at: now,
        };

        tables.usernames.insert(user.username.clone());
        tables.emails.insert(user.email.clone());
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_members(&self, limit: Option<i64>) -> StoreResult<Vec<MemberProfile>> {
        let tables = self.tables.read().await;
        let take = limit.map_or(usize::MAX, |l| l.max(0) as usize);

        Ok(tables
            .users
            .iter()
            .rev()
            .take(take)
            .map(User::profile)
            .collect())
    }

    async fn create_community(&self, data: CreateCommunity) -> StoreResult<Community> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let community = Community {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            category: data.category,
            avatar_url: data.avatar_url,
            banner_url: data.banner_url,
            member_count: 0,
            is_featured: false,
            created_at: now,
            updated_at: now,
        };

        tables.communities.push(community.clone());
        Ok(community)
    }

    async fn find_community(&self, id: Uuid) -> StoreResult<Option<Community>> {
        let tables = self.tables.read().await;
        Ok(tables.communities.iter().find(|c| c.id == id).cloned())
    }

    async fn list_communities(&self) -> StoreResult<Vec<Community>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.communities))
    }

    async fn list_communities_by_category(&self, category: &str) -> StoreResult<Vec<Community>> {
        let tables = self.tables.read().await;

        let mut matching: Vec<Community> = newest_first(&tables.communities)
            .into_iter()
            .filter(|c| c.category == category)
            .collect();
        matching.sort_by(|a, b| b.member_count.cmp(&a.member_count));

        Ok(matching)
    }

    async fn popular_communities(&self, limit: i64) -> StoreResult<Vec<Community>> {
        let tables = self.tables.read().await;

        let mut all = newest_first(&tables.communities);
        all.sort_by(|a, b| b.member_count.cmp(&a.member_count));
        all.truncate(limit.max(0) as usize);

        Ok(all)
    }

    async fn join_community(&self, data: CreateCommunityMember) -> StoreResult<CommunityMember> {
        let mut tables = self.tables.write().await;

        tables.require_user(data.user_id)?;

        if tables
            .members
            .iter()
            .any(|m| m.community_id == data.community_id && m.user_id == data.user_id)
        {
            return Err(StoreError::Conflict("community_members_pkey".to_string()));
        }

        let now = Utc::now();
        let community = tables
            .communities
            .iter_mut()
            .find(|c| c.id == data.community_id)
            .ok_or_else(|| StoreError::NotFound("community".to_string()))?;
        community.member_count += 1;
        community.updated_at = now;

        let member = CommunityMember {
            community_id: data.community_id,
            user_id: data.user_id,
            role: data.role,
            joined_at: now,
        };
        tables.members.push(member.clone());

        Ok(member)
    }

    async fn create_track(&self, data: CreateTrack) -> StoreResult<Track> {
        let mut tables = self.tables.write().await;
        tables.require_user(data.user_id)?;

        let track = Track {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            artist: data.artist,
            album: data.album,
            duration: data.duration,
            audio_url: data.audio_url,
            cover_url: data.cover_url,
            created_at: Utc::now(),
        };

        tables.tracks.push(track.clone());
        Ok(track)
    }

    async fn list_tracks(&self, limit: i64) -> StoreResult<Vec<Track>> {
        let tables = self.tables.read().await;
        let mut tracks = newest_first(&tables.tracks);
        tracks.truncate(limit.max(0) as usize);
        Ok(tracks)
    }

    async fn create_playlist(&self, data: CreatePlaylist) -> StoreResult<Playlist> {
        let mut tables = self.tables.write().await;
        tables.require_user(data.user_id)?;

        let now = Utc::now();
        let playlist = Playlist {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            description: data.description,
            is_public: data.is_public,
            created_at: now,
            updated_at: now,
        };

        tables.playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn list_playlists(&self, owner_id: Uuid) -> StoreResult<Vec<Playlist>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.playlists)
            .into_iter()
            .filter(|p| p.user_id == owner_id)
            .collect())
    }

    async fn find_playlist(
        &self,
        id: Uuid,
        viewer_id: Uuid,
    ) -> StoreResult<Option<PlaylistWithTracks>> {
        let tables = self.tables.read().await;

        let playlist = match tables.playlists.iter().find(|p| p.id == id) {
            Some(p) if p.visible_to(viewer_id) => p.clone(),
            _ => return Ok(None),
        };

        let tracks = tables.entries(playlist.id);
        Ok(Some(PlaylistWithTracks { playlist, tracks }))
    }

    async fn update_playlist(
        &self,
        id: Uuid,
        owner_id: Uuid,
        data: UpdatePlaylist,
    ) -> StoreResult<Option<Playlist>> {
        let mut tables = self.tables.write().await;

        let Some(playlist) = tables
            .playlists
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(name) = data.name {
            playlist.name = name;
        }
        if let Some(description) = data.description {
            playlist.description = description;
        }
        if let Some(is_public) = data.is_public {
            playlist.is_public = is_public;
        }
        playlist.updated_at = Utc::now();

        Ok(Some(playlist.clone()))
    }

    async fn delete_playlist(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.playlists.len();
        tables
            .playlists
            .retain(|p| !(p.id == id && p.user_id == owner_id));

        if tables.playlists.len() == before {
            return Ok(false);
        }

        tables.playlist_tracks.retain(|row| row.playlist_id != id);
        Ok(true)
    }

    async fn add_playlist_track(
        &self,
        playlist_id: Uuid,
        owner_id: Uuid,
        track_id: Uuid,
    ) -> StoreResult<PlaylistEntry> {
        let mut tables = self.tables.write().await;

        if !tables
            .playlists
            .iter()
            .any(|p| p.id == playlist_id && p.user_id == owner_id)
        {
            return Err(StoreError::NotFound("playlist".to_string()));
        }

        let track = tables
            .tracks
            .iter()
            .find(|t| t.id == track_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("track".to_string()))?;

        let existing = tables
            .playlist_tracks
            .iter()
            .filter(|row| row.playlist_id == playlist_id);

        let mut next_position = 0;
        for row in existing {
            if row.track_id == track_id {
                return Err(StoreError::Conflict("playlist_tracks_pkey".to_string()));
            }
            next_position = next_position.max(row.position + 1);
        }

        let added_at = Utc::now();
        tables.playlist_tracks.push(PlaylistTrackRow {
            playlist_id,
            track_id,
            position: next_position,
            added_at,
        });

        Ok(PlaylistEntry {
            playlist_id,
            position: next_position,
            added_at,
            track,
        })
    }

    async fn create_activity(&self, data: CreateActivity) -> StoreResult<Activity> {
        let mut tables = self.tables.write().await;

        tables.require_user(data.user_id)?;
        if let Some(target) = data.target_user_id {
            tables.require_user(target)?;
        }
        if let Some(target) = data.target_community_id {
            tables.require_community(target)?;
        }

        let activity = Activity {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            activity_type: data.activity_type,
            message: data.message,
            target_user_id: data.target_user_id,
            target_community_id: data.target_community_id,
            created_at: Utc::now(),
        };

        tables.activities.push(activity.clone());
        Ok(activity)
    }

    async fn activity_feed(&self, limit: i64) -> StoreResult<Vec<ActivityWithUser>> {
        let tables = self.tables.read().await;

        Ok(tables
            .activities
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .map(|activity| ActivityWithUser {
                user: tables.user(activity.user_id).map(|u| ActivityUser {
                    id: u.id,
                    username: u.username.clone(),
                    display_name: u.display_name.clone(),
                    avatar_url: u.avatar_url.clone(),
                }),
                activity: activity.clone(),
            })
            .collect())
    }
}
