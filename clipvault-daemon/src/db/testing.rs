//! Shared test utilities for database tests

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Create an in-memory database with the schema applied
///
/// Capped at one connection: each connection to `sqlite::memory:` would
/// otherwise see its own empty database.
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database should open");

    super::create_schema(&pool)
        .await
        .expect("schema creation should succeed");

    pool
}
