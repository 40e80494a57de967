/// Bearer-token gate for protected routes
///
/// Runs before every protected handler. A request without a verifying token
/// is answered with a 401 envelope and never reaches the handler, so no data
/// is read or written. A verified request carries an [`AuthContext`] in its
/// extensions for the duration of that request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use daccord_shared::auth::middleware::{authenticate, AuthContext};

use crate::app::AppState;
use crate::error::ApiError;

/// Axum middleware that authenticates the caller or rejects with 401
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth: AuthContext = authenticate(request.headers(), state.jwt_secret())?;

    tracing::debug!(
        user_id = %auth.user_id,
        path = %request.uri().path(),
        "Authenticated request"
    );

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}
