/// Music endpoints: playlists and tracks
///
/// # Playlists
///
/// - `GET    /api/music/playlists` - Caller's playlists, newest first
/// - `POST   /api/music/playlists` - Create a playlist
/// - `GET    /api/music/playlists/:id` - Playlist with tracks (owner, or public)
/// - `PUT    /api/music/playlists/:id` - Partial update (owner only)
/// - `DELETE /api/music/playlists/:id` - Delete (owner only)
/// - `POST   /api/music/playlists/:id/tracks` - Append a track (owner only)
///
/// # Tracks
///
/// - `GET  /api/music/tracks?limit=N` - Newest tracks, `N` clamped to 1..=100
/// - `POST /api/music/tracks` - Add a track
///
/// # Ownership
///
/// A playlist that exists but belongs to someone else answers 404, exactly
/// like one that does not exist.

use axum::{extract::State, Extension};
use daccord_shared::{
    auth::middleware::AuthContext,
    models::{
        playlist::POSITION_CONSTRAINT, track::clamp_track_limit, CreatePlaylist, CreateTrack,
        Playlist, PlaylistEntry, PlaylistWithTracks, Track, UpdatePlaylist,
    },
    store::StoreError,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ApiQuery, ValidJson},
    response::ApiResponse,
    routes::validation::not_blank,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Playlist name is required"),
        length(max = 100, message = "Playlist name must be at most 100 characters")
    )]
    pub name: String,

    pub description: Option<String>,

    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    #[validate(
        custom(function = "not_blank", message = "Playlist name cannot be empty"),
        length(max = 100, message = "Playlist name must be at most 100 characters")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackRequest {
    #[validate(required(message = "Track ID is required"))]
    pub track_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Artist is required"),
        length(max = 200, message = "Artist must be at most 200 characters")
    )]
    pub artist: String,

    #[validate(length(max = 200, message = "Album must be at most 200 characters"))]
    pub album: Option<String>,

    /// Seconds
    #[validate(
        required(message = "Duration is required"),
        range(min = 1, message = "Duration must be at least 1 second")
    )]
    pub duration: Option<i32>,

    #[validate(length(max = 512, message = "Audio URL must be at most 512 characters"))]
    pub audio_url: Option<String>,

    #[validate(length(max = 512, message = "Cover URL must be at most 512 characters"))]
    pub cover_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackListQuery {
    pub limit: Option<i64>,
}

pub async fn list_playlists(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<Vec<Playlist>>> {
    Ok(ApiResponse::ok(
        state.store.list_playlists(auth.user_id).await?,
    ))
}

pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreatePlaylistRequest>,
) -> ApiResult<ApiResponse<Playlist>> {
    let playlist = state
        .store
        .create_playlist(CreatePlaylist {
            user_id: auth.user_id,
            name: req.name.trim().to_string(),
            description: req.description.unwrap_or_default(),
            is_public: req.is_public.unwrap_or(false),
        })
        .await?;

    tracing::info!(playlist_id = %playlist.id, user_id = %auth.user_id, "Playlist created");

    Ok(ApiResponse::created(playlist))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<ApiResponse<PlaylistWithTracks>> {
    let playlist = state
        .store
        .find_playlist(id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist"))?;

    Ok(ApiResponse::ok(playlist))
}

pub async fn update_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdatePlaylistRequest>,
) -> ApiResult<ApiResponse<Playlist>> {
    let changes = UpdatePlaylist {
        name: req.name.map(|n| n.trim().to_string()),
        description: req.description,
        is_public: req.is_public,
    };

    let playlist = state
        .store
        .update_playlist(id, auth.user_id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist"))?;

    Ok(ApiResponse::ok(playlist))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<ApiResponse<()>> {
    if !state.store.delete_playlist(id, auth.user_id).await? {
        return Err(ApiError::not_found("Playlist"));
    }

    tracing::info!(playlist_id = %id, user_id = %auth.user_id, "Playlist deleted");

    Ok(ApiResponse::message("Playlist deleted"))
}

/// Appends a track at the end of one of the caller's playlists
///
/// # Errors
///
/// - 404 if the playlist is missing or not the caller's, or the track is missing
/// - 409 if the track is already in the playlist, or another append took
///   the same slot
pub async fn add_playlist_track(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<AddTrackRequest>,
) -> ApiResult<ApiResponse<PlaylistEntry>> {
    let track_id = req
        .track_id
        .ok_or_else(|| ApiError::BadRequest("Track ID is required".to_string()))?;

    let entry = state
        .store
        .add_playlist_track(id, auth.user_id, track_id)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(constraint) if constraint == POSITION_CONSTRAINT => {
                ApiError::Conflict("Playlist was modified concurrently, retry".to_string())
            }
            StoreError::Conflict(_) => {
                ApiError::Conflict("Track is already in this playlist".to_string())
            }
            other => other.into(),
        })?;

    Ok(ApiResponse::created(entry))
}

pub async fn list_tracks(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TrackListQuery>,
) -> ApiResult<ApiResponse<Vec<Track>>> {
    let limit = clamp_track_limit(query.limit);
    Ok(ApiResponse::ok(state.store.list_tracks(limit).await?))
}

pub async fn create_track(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateTrackRequest>,
) -> ApiResult<ApiResponse<Track>> {
    let duration = req
        .duration
        .ok_or_else(|| ApiError::BadRequest("Duration is required".to_string()))?;

    let track = state
        .store
        .create_track(CreateTrack {
            user_id: auth.user_id,
            title: req.title.trim().to_string(),
            artist: req.artist.trim().to_string(),
            album: req.album,
            duration,
            audio_url: req.audio_url,
            cover_url: req.cover_url,
        })
        .await?;

    tracing::info!(track_id = %track.id, user_id = %auth.user_id, "Track added");

    Ok(ApiResponse::created(track))
}
