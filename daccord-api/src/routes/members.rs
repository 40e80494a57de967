/// Member endpoints
///
/// - `GET  /api/members` - Every member profile, newest first
/// - `GET  /api/members/new` - The ten newest profiles with `joined_at`
/// - `POST /api/members` - Join a community as the caller

use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use daccord_shared::{
    auth::middleware::AuthContext,
    models::{CommunityMember, CommunityRole, CreateCommunityMember, MemberProfile},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidJson,
    response::ApiResponse,
};

const NEWEST_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[validate(required(message = "Community ID is required"))]
    pub community_id: Option<Uuid>,
}

/// Profile as shown in the "new members" strip
#[derive(Debug, Serialize, Deserialize)]
pub struct NewMember {
    #[serde(flatten)]
    pub profile: MemberProfile,

    pub joined_at: DateTime<Utc>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<MemberProfile>>> {
    Ok(ApiResponse::ok(state.store.list_members(None).await?))
}

pub async fn newest(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<NewMember>>> {
    let members = state
        .store
        .list_members(Some(NEWEST_LIMIT))
        .await?
        .into_iter()
        .map(|profile| NewMember {
            joined_at: profile.created_at,
            profile,
        })
        .collect();

    Ok(ApiResponse::ok(members))
}

/// Adds the caller to a community
///
/// The membership row and the community's `member_count` change together
/// or not at all.
///
/// # Errors
///
/// - 400 without `communityId`
/// - 404 if the community does not exist
/// - 409 if the caller is already a member
pub async fn join(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<JoinRequest>,
) -> ApiResult<ApiResponse<CommunityMember>> {
    let community_id = req
        .community_id
        .ok_or_else(|| ApiError::BadRequest("Community ID is required".to_string()))?;

    let member = state
        .store
        .join_community(CreateCommunityMember {
            community_id,
            user_id: auth.user_id,
            role: CommunityRole::Member,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => {
                ApiError::Conflict("Already a member of this community".to_string())
            }
            StoreError::NotFound(_) => ApiError::not_found("Community"),
            other => other.into(),
        })?;

    tracing::info!(
        %community_id,
        user_id = %auth.user_id,
        role = member.role.as_str(),
        "Joined community"
    );

    Ok(ApiResponse::created(member))
}
