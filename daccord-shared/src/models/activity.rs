/// Activity feed model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE activities (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     activity_type VARCHAR(50) NOT NULL,
///     message TEXT NOT NULL,
///     target_user_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     target_community_id UUID REFERENCES communities(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Size of the full feed
pub const FEED_LIMIT: i64 = 50;

/// Size of the "recent" feed
pub const RECENT_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_type: String,
    pub message: String,
    pub target_user_id: Option<Uuid>,
    pub target_community_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub user_id: Uuid,
    pub activity_type: String,
    pub message: String,
    pub target_user_id: Option<Uuid>,
    pub target_community_id: Option<Uuid>,
}

/// The actor shown next to a feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityUser {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Feed entry with its actor embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWithUser {
    #[serde(flatten)]
    pub activity: Activity,
    pub user: Option<ActivityUser>,
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    #[sqlx(flatten)]
    activity: Activity,
    username: Option<String>,
    display_name: Option<String>,
    avatar_url: Option<String>,
}

impl From<FeedRow> for ActivityWithUser {
    fn from(row: FeedRow) -> Self {
        let user = match (row.username, row.display_name) {
            (Some(username), Some(display_name)) => Some(ActivityUser {
                id: row.activity.user_id,
                username,
                display_name,
                avatar_url: row.avatar_url,
            }),
            _ => None,
        };

        ActivityWithUser {
            activity: row.activity,
            user,
        }
    }
}

impl Activity {
    pub async fn create(pool: &PgPool, data: CreateActivity) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (user_id, activity_type, message, target_user_id, target_community_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, activity_type, message, target_user_id, target_community_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.activity_type)
        .bind(data.message)
        .bind(data.target_user_id)
        .bind(data.target_community_id)
        .fetch_one(pool)
        .await
    }

    /// Newest activities with their actor, at most `limit`
    pub async fn feed(pool: &PgPool, limit: i64) -> Result<Vec<ActivityWithUser>, sqlx::Error> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT a.id, a.user_id, a.activity_type, a.message,
                   a.target_user_id, a.target_community_id, a.created_at,
                   u.username, u.display_name, u.avatar_url
            FROM activities a
            LEFT JOIN users u ON u.id = a.user_id
            ORDER BY a.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(ActivityWithUser::from).collect())
    }
}
