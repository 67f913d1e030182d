//! Database layer for encrypted clipboard history

mod entries;
pub mod sql;

#[cfg(test)]
pub mod testing;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

pub use entries::{Entry, EntryDb};

/// Schema version written to the meta table at create time
const SCHEMA_VERSION: &str = "1";

/// Initialize the database connection pool and create the schema
///
/// Opens (or creates) the SQLite file in WAL mode with foreign keys on.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or schema creation fails.
pub async fn init_db(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and record the schema version
async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(sql::SQL_CREATE_ENTRIES_TABLE).execute(pool).await?;
    sqlx::query(sql::SQL_CREATE_META_TABLE).execute(pool).await?;
    sqlx::query(sql::SQL_INIT_SCHEMA_VERSION)
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Main database interface holding all table-specific access
///
/// SqlitePool uses Arc internally, so clone() is cheap.
#[derive(Clone)]
pub struct Database {
    pub entries: EntryDb,
    pool: SqlitePool,
}

impl Database {
    /// Create a new Database instance from a connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            entries: EntryDb::new(pool.clone()),
            pool,
        }
    }

    /// Run SQLite's integrity check
    ///
    /// Returns true when the database reports "ok".
    pub async fn check_integrity(&self) -> Result<bool, sqlx::Error> {
        let result: String = sqlx::query_scalar(sql::SQL_INTEGRITY_CHECK)
            .fetch_one(&self.pool)
            .await?;

        Ok(result == "ok")
    }

    /// Close the connection pool, flushing WAL state
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
