/// Community endpoints
///
/// - `GET  /api/communities` - All communities, newest first
/// - `POST /api/communities` - Create a community
/// - `GET  /api/communities/popular` - Twelve largest communities
/// - `GET  /api/communities/category/:category` - One category, largest first
/// - `GET  /api/communities/:id` - A single community

use axum::{extract::State, Extension};
use daccord_shared::{
    auth::middleware::AuthContext,
    models::{community::POPULAR_LIMIT, Community, CreateCommunity},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ValidJson},
    response::ApiResponse,
    routes::validation::not_blank,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Category is required"),
        length(max = 50, message = "Category must be at most 50 characters")
    )]
    pub category: String,

    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 512, message = "Banner URL must be at most 512 characters"))]
    pub banner_url: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Community>>> {
    Ok(ApiResponse::ok(state.store.list_communities().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateCommunityRequest>,
) -> ApiResult<ApiResponse<Community>> {
    let community = state
        .store
        .create_community(CreateCommunity {
            name: req.name.trim().to_string(),
            description: req.description.trim().to_string(),
            category: req.category.trim().to_string(),
            avatar_url: req.avatar_url,
            banner_url: req.banner_url,
        })
        .await?;

    tracing::info!(
        community_id = %community.id,
        created_by = %auth.user_id,
        "Community created"
    );

    Ok(ApiResponse::created(community))
}

pub async fn popular(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Community>>> {
    Ok(ApiResponse::ok(
        state.store.popular_communities(POPULAR_LIMIT).await?,
    ))
}

pub async fn by_category(
    State(state): State<AppState>,
    ApiPath(category): ApiPath<String>,
) -> ApiResult<ApiResponse<Vec<Community>>> {
    Ok(ApiResponse::ok(
        state.store.list_communities_by_category(&category).await?,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<ApiResponse<Community>> {
    let community = state
        .store
        .find_community(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Community"))?;

    Ok(ApiResponse::ok(community))
}
