/// Authentication utilities
///
/// # Modules
///
/// - [`jwt`]: Token issuing (7-day HS256 JWTs) and verification
/// - [`password`]: Argon2id password hashing and verification
/// - [`middleware`]: Bearer-token extraction and the per-request [`middleware::AuthContext`]
///
/// # Example
///
/// ```
/// use daccord_shared::auth::jwt::{issue_token, verify_token};
/// use uuid::Uuid;
///
/// let secret = "your-secret-key-at-least-32-bytes-long";
/// let token = issue_token(Uuid::new_v4(), "ada", secret).unwrap();
/// assert!(verify_token(Some(&token), secret).is_some());
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
