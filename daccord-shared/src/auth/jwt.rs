/// JWT token issuing and verification module
///
/// Every protected Daccord route is gated on a bearer token produced here.
/// Tokens are signed using HS256 (HMAC-SHA256) with a symmetric secret held in
/// process configuration and carry the caller's user id and username.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: exactly 7 days after issuance, no leeway on validation
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Lifecycle
///
/// A token is either valid or invalid. There is no refresh flow and no
/// revocation list: a token becomes invalid when it expires or when the
/// signing secret changes, and a new one must be obtained by logging in.
///
/// # Example
///
/// ```
/// use daccord_shared::auth::jwt::{create_token, verify_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes-long";
///
/// let claims = Claims::new(user_id, "ada");
/// let token = create_token(&claims, secret)?;
///
/// let verified = verify_token(Some(&token), secret).expect("token should verify");
/// assert_eq!(verified.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in, and required of, every token
pub const ISSUER: &str = "daccord";

/// How long an issued token stays valid
pub fn token_lifetime() -> Duration {
    Duration::days(7)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature does not match the configured secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "daccord")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
///
/// # Custom Claims
///
/// - `username`: Username of the subject at issuance time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Username at the time the token was issued
    pub username: String,

    /// Issuer - Always "daccord"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring 7 days from now
    ///
    /// # Example
    ///
    /// ```
    /// use daccord_shared::auth::jwt::Claims;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::new(Uuid::new_v4(), "ada");
    /// assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    /// ```
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self::with_expiration(user_id, username, token_lifetime())
    }

    /// Creates claims with custom expiration
    ///
    /// A negative duration produces claims that are already expired, which is
    /// mostly useful in tests.
    pub fn with_expiration(user_id: Uuid, username: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            username: username.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 (HMAC-SHA256) with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a fresh 7-day token for a user
pub fn issue_token(user_id: Uuid, username: &str, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id, username), secret)
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid under `secret`
/// - The current time is strictly before `exp` (no leeway)
/// - Issuer is "daccord"
///
/// # Errors
///
/// Returns the specific reason the token was rejected.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_) => JwtError::InvalidFormat(e.to_string()),
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    // jsonwebtoken accepts exp == now; a token is only valid strictly before it.
    if token_data.claims.is_expired() {
        return Err(JwtError::Expired);
    }

    Ok(token_data.claims)
}

/// Verifies an optional credential, reporting failure as `None`
///
/// This never returns an error to the caller. A missing token, a bad
/// signature, a foreign secret, or an expired token all yield `None`; the
/// reason is logged.
pub fn verify_token(token: Option<&str>, secret: &str) -> Option<Claims> {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => {
            tracing::debug!("No bearer token presented");
            return None;
        }
    };

    match validate_token(token, secret) {
        Ok(claims) => Some(claims),
        Err(JwtError::Expired) => {
            tracing::debug!("Token verification failed: token expired");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token verification failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_lifetime_is_seven_days() {
        assert_eq!(token_lifetime(), Duration::days(7));

        let claims = Claims::new(Uuid::new_v4(), "ada");
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, "ada");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.iss, "daccord");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(Uuid::new_v4(), "ada", Duration::hours(1));

        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_verify_immediately() {
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, "ada", SECRET).expect("Should create token");
        let verified = verify_token(Some(&token), SECRET).expect("Should verify token");

        assert_eq!(verified.sub, user_id);
        assert_eq!(verified.username, "ada");
        assert_eq!(verified.iss, "daccord");
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), "ada", SECRET).unwrap();

        assert!(verify_token(Some(&token), "another-secret-key-at-least-32-bytes").is_none());
        assert!(matches!(
            validate_token(&token, "another-secret-key-at-least-32-bytes"),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_verify_expired_token() {
        let claims = Claims::with_expiration(Uuid::new_v4(), "ada", Duration::seconds(-3600));

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
        assert!(verify_token(Some(&token), SECRET).is_none());
    }

    #[test]
    fn test_verify_token_just_past_expiry() {
        // Expired a few seconds ago; any leeway would let this through.
        let claims = Claims::with_expiration(Uuid::new_v4(), "ada", Duration::seconds(-5));
        let token = create_token(&claims, SECRET).unwrap();

        assert!(verify_token(Some(&token), SECRET).is_none());
    }

    #[test]
    fn test_verify_missing_token() {
        assert!(verify_token(None, SECRET).is_none());
        assert!(verify_token(Some(""), SECRET).is_none());
    }

    #[test]
    fn test_verify_garbage_token() {
        assert!(verify_token(Some("not-a-jwt"), SECRET).is_none());
        assert!(validate_token("not-a-jwt", SECRET).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = issue_token(Uuid::new_v4(), "ada", SECRET).unwrap();

        let forged_claims = Claims::new(Uuid::new_v4(), "mallory");
        let forged = create_token(&forged_claims, "attacker-secret-at-least-32-bytes!!").unwrap();

        // Original header and signature around the forged payload
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
        assert!(verify_token(Some(&tampered), SECRET).is_none());
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), "ada");
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::InvalidIssuer { .. })
        ));
    }
}
