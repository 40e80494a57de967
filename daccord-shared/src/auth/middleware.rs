/// Request authentication primitives for Axum
///
/// Protected routes authenticate a request by pulling the bearer token out of
/// the `Authorization` header, running it through the token verifier, and
/// attaching an [`AuthContext`] to the request extensions. Handlers then read
/// the caller's identity from that context instead of any ambient state.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use daccord_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{verify_token, Claims};

/// Authenticated caller identity for a single request
///
/// Populated by the auth layer after the token verifies and dropped with the
/// request. Nothing outlives the request that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (token subject)
    pub user_id: Uuid,

    /// Username carried in the token
    pub username: String,
}

impl AuthContext {
    /// Creates auth context from verified claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No usable credential was presented
    #[error("Missing credentials")]
    MissingCredentials,

    /// A credential was presented but did not verify
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Extracts the bearer token from request headers
///
/// Returns `None` when the header is absent, not valid UTF-8, does not use the
/// `Bearer` scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if there is no bearer token
/// - `AuthError::InvalidToken` if the token fails verification
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingCredentials)?;

    verify_token(Some(token), secret)
        .map(AuthContext::from_claims)
        .ok_or(AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, issue_token};
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate_valid_token() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "ada", SECRET).unwrap();

        let context = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.username, "ada");
    }

    #[test]
    fn test_authenticate_missing_header() {
        assert_eq!(
            authenticate(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_authenticate_expired_token() {
        let claims = Claims::with_expiration(Uuid::new_v4(), "ada", Duration::days(-8));
        let token = create_token(&claims, SECRET).unwrap();

        assert_eq!(
            authenticate(&headers_with(&format!("Bearer {}", token)), SECRET),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_authenticate_foreign_secret() {
        let token = issue_token(Uuid::new_v4(), "ada", "some-other-secret-that-is-32-bytes!").unwrap();

        assert_eq!(
            authenticate(&headers_with(&format!("Bearer {}", token)), SECRET),
            Err(AuthError::InvalidToken)
        );
    }
}
