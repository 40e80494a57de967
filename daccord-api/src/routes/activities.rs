/// Activity feed endpoints
///
/// - `GET  /api/activities` - Fifty newest entries with their actor
/// - `GET  /api/activities/recent` - Ten newest entries with their actor
/// - `POST /api/activities` - Post an entry as the caller

use axum::{extract::State, Extension};
use daccord_shared::{
    auth::middleware::AuthContext,
    models::{
        activity::{FEED_LIMIT, RECENT_LIMIT},
        Activity, ActivityWithUser, CreateActivity,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::ApiResult,
    extract::ValidJson,
    response::ApiResponse,
    routes::validation::not_blank,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Activity type is required"),
        length(max = 50, message = "Activity type must be at most 50 characters")
    )]
    pub activity_type: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Message is required"))]
    pub message: String,

    pub target_user_id: Option<Uuid>,

    pub target_community_id: Option<Uuid>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<ActivityWithUser>>> {
    Ok(ApiResponse::ok(state.store.activity_feed(FEED_LIMIT).await?))
}

pub async fn recent(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<ActivityWithUser>>> {
    Ok(ApiResponse::ok(
        state.store.activity_feed(RECENT_LIMIT).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateActivityRequest>,
) -> ApiResult<ApiResponse<Activity>> {
    let activity = state
        .store
        .create_activity(CreateActivity {
            user_id: auth.user_id,
            activity_type: req.activity_type.trim().to_string(),
            message: req.message,
            target_user_id: req.target_user_id,
            target_community_id: req.target_community_id,
        })
        .await?;

    Ok(ApiResponse::created(activity))
}
