/// Authentication endpoints
///
/// - `POST /api/auth/register` - Create an account and get a token
/// - `POST /api/auth/login` - Exchange email and password for a token
///
/// Both return `{ token, user }` where `user` is the camelCase summary.
/// Tokens are HS256 JWTs valid for seven days.

use axum::extract::State;
use daccord_shared::{
    auth::{jwt, password},
    models::{CreateUser, UserSummary},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidJson,
    response::ApiResponse,
    routes::validation::{not_blank, valid_username},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(
        function = "valid_username",
        message = "Username must be 3-20 characters: letters, numbers and underscores only"
    ))]
    pub username: String,

    #[serde(default)]
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Display name is required"),
        length(max = 100, message = "Display name must be at most 100 characters")
    )]
    pub display_name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus the account it was issued for
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,

    pub user: UserSummary,
}

/// Registers a new user
///
/// Duplicate usernames and emails are caught by the store's uniqueness
/// constraints and reported as 409.
///
/// # Errors
///
/// - 400 if a field fails validation
/// - 409 if the username or email is taken
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let password_hash = password::hash_password_async(req.password).await?;

    let user = state
        .store
        .create_user(CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            display_name: req.display_name.trim().to_string(),
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;

    let token = jwt::issue_token(user.id, &user.username, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(ApiResponse::created(AuthResponse {
        token,
        user: user.summary(),
    }))
}

/// Logs in with email and password
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password_async(req.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let token = jwt::issue_token(user.id, &user.username, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: user.summary(),
    }))
}
