/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(20) NOT NULL,            -- UNIQUE (users_username_key)
///     email VARCHAR(255) NOT NULL,              -- UNIQUE (users_email_key)
///     password_hash VARCHAR(255) NOT NULL,
///     display_name VARCHAR(100) NOT NULL,
///     handle VARCHAR(21) NOT NULL,
///     avatar_url VARCHAR(512),
///     role user_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Uniqueness of `username` and `email` is enforced only by the constraints
/// above. `User::create` surfaces a duplicate as a unique-violation error and
/// never checks for an existing row first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Site-wide role of a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Member,
    Moderator,
    Admin,
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    pub username: String,

    pub email: String,

    /// Argon2id PHC string; never leaves the server
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub display_name: String,

    /// `"@" + username`
    pub handle: String,

    pub avatar_url: Option<String>,

    pub role: UserRole,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    pub email: String,

    /// Argon2id hash, NOT the plaintext password
    pub password_hash: String,

    pub display_name: String,
}

/// Public profile shown in member listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub handle: String,
    pub created_at: DateTime<Utc>,
}

/// Summary returned by registration and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub handle: String,
}

/// Derives the display handle from a username
pub fn handle_for(username: &str) -> String {
    format!("@{}", username)
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            handle: self.handle.clone(),
        }
    }

    pub fn profile(&self) -> MemberProfile {
        MemberProfile {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
            handle: self.handle.clone(),
            created_at: self.created_at,
        }
    }

    /// Inserts a new user with role `member` and a handle derived from the username
    ///
    /// # Errors
    ///
    /// Returns a database error with SQLSTATE `23505` if the username or email
    /// is already taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let handle = handle_for(&data.username);

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, display_name, handle)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, display_name, handle,
                      avatar_url, role, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.display_name)
        .bind(handle)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, display_name, handle,
                   avatar_url, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Lists public profiles, newest first
    ///
    /// `limit = None` returns every user.
    pub async fn list_profiles(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<MemberProfile>, sqlx::Error> {
        sqlx::query_as::<_, MemberProfile>(
            r#"
            SELECT id, username, display_name, avatar_url, handle, created_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "ada_l".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            display_name: "Ada".to_string(),
            handle: handle_for("ada_l"),
            avatar_url: None,
            role: UserRole::Member,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_handle_derivation() {
        assert_eq!(handle_for("ada_l"), "@ada_l");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["handle"], "@ada_l");
        assert_eq!(json["role"], "member");
    }

    #[test]
    fn test_summary_is_camel_case() {
        let json = serde_json::to_value(sample_user().summary()).unwrap();

        assert_eq!(json["displayName"], "Ada");
        assert_eq!(json["handle"], "@ada_l");
        assert!(json.get("email").is_some());
    }
}
