/// Embedded schema migrations
///
/// The SQL files under `daccord-shared/migrations/` are compiled into the
/// binary and applied at startup. Uniqueness of usernames and emails, the
/// membership primary key, and foreign keys all live in these files; the
/// store relies on them rather than on application-side checks.

use sqlx::postgres::PgPool;
use tracing::{error, info};

/// Applies every pending migration
///
/// # Errors
///
/// Returns an error if a migration fails; that migration is rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Number of migrations successfully applied so far
pub async fn applied_migration_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
        .fetch_one(pool)
        .await
}
