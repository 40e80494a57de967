/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations
///
/// Row models and their queries live in [`crate::models`].

pub mod migrations;
pub mod pool;

/// SQLSTATE for `unique_violation`
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `foreign_key_violation`
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
