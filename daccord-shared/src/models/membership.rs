/// Community membership model
///
/// # Schema
///
/// ```sql
/// CREATE TYPE community_role AS ENUM ('owner', 'moderator', 'member');
///
/// CREATE TABLE community_members (
///     community_id UUID NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role community_role NOT NULL DEFAULT 'member',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (community_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use daccord_shared::models::membership::{CommunityMember, CommunityRole, CreateCommunityMember};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, community_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let membership = CommunityMember::join(&pool, CreateCommunityMember {
///     community_id,
///     user_id,
///     role: CommunityRole::Member,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::community::Community;

/// Role of a user inside one community
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "community_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CommunityRole {
    /// Created or owns the community
    Owner,

    /// Can moderate content
    Moderator,

    /// Regular member
    #[default]
    Member,
}

impl CommunityRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunityRole::Owner => "owner",
            CommunityRole::Moderator => "moderator",
            CommunityRole::Member => "member",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommunityMember {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub role: CommunityRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCommunityMember {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub role: CommunityRole,
}

impl CommunityMember {
    /// Adds a user to a community and bumps its member count
    ///
    /// Both writes run in one transaction: if either fails, neither is
    /// applied and the counter cannot drift from the membership rows.
    ///
    /// # Errors
    ///
    /// - SQLSTATE `23505` if the user is already a member
    /// - SQLSTATE `23503` if the community or user does not exist
    pub async fn join(pool: &PgPool, data: CreateCommunityMember) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let member = sqlx::query_as::<_, CommunityMember>(
            r#"
            INSERT INTO community_members (community_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING community_id, user_id, role, joined_at
            "#,
        )
        .bind(data.community_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(&mut *tx)
        .await?;

        if !Community::increment_member_count(&mut tx, data.community_id).await? {
            // Unreachable while the foreign key holds; dropping tx rolls back.
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;
        Ok(member)
    }
}
