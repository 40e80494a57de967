/// Community model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE communities (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL,
///     category VARCHAR(50) NOT NULL,
///     avatar_url VARCHAR(512),
///     banner_url VARCHAR(512),
///     member_count INTEGER NOT NULL DEFAULT 0,
///     is_featured BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `member_count` is a denormalized counter. It is only ever changed inside
/// the same transaction that inserts the membership row (see
/// [`crate::models::membership::CommunityMember::join`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Number of communities returned by the popular listing
pub const POPULAR_LIMIT: i64 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub member_count: i32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a community; new communities start with no members
#[derive(Debug, Clone)]
pub struct CreateCommunity {
    pub name: String,
    pub description: String,
    pub category: String,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
}

const COLUMNS: &str = "id, name, description, category, avatar_url, banner_url, \
                       member_count, is_featured, created_at, updated_at";

impl Community {
    pub async fn create(pool: &PgPool, data: CreateCommunity) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Community>(&format!(
            "INSERT INTO communities (name, description, category, avatar_url, banner_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.category)
        .bind(data.avatar_url)
        .bind(data.banner_url)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Community>(&format!("SELECT {COLUMNS} FROM communities WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All communities, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Community>(&format!(
            "SELECT {COLUMNS} FROM communities ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Communities in one category, largest first
    pub async fn list_by_category(pool: &PgPool, category: &str) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Community>(&format!(
            "SELECT {COLUMNS} FROM communities \
             WHERE category = $1 \
             ORDER BY member_count DESC, created_at DESC"
        ))
        .bind(category)
        .fetch_all(pool)
        .await
    }

    /// The `limit` largest communities by member count
    pub async fn list_popular(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Community>(&format!(
            "SELECT {COLUMNS} FROM communities \
             ORDER BY member_count DESC, created_at DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Bumps the member counter by one
    ///
    /// Takes a connection rather than the pool so it can run inside the
    /// membership transaction.
    pub async fn increment_member_count(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE communities
            SET member_count = member_count + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
