//! Entry database operations

use sqlx::sqlite::SqlitePool;

use crate::db::sql;

/// A clipboard history entry from the database
///
/// Content is stored encrypted; `ciphertext` and `nonce` go back through
/// `ClipCrypto` to recover the plaintext.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: i64,
    pub content_hash: String,
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub content_type: String,
    pub content_len: i64,
    pub created_at: String,
    pub accessed_at: String,
}

/// Row type for entry queries
type EntryRow = (
    i64,
    String,
    Vec<u8>,
    Vec<u8>,
    String,
    i64,
    String,
    String,
);

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.0,
            content_hash: row.1,
            ciphertext: row.2,
            nonce: row.3,
            content_type: row.4,
            content_len: row.5,
            created_at: row.6,
            accessed_at: row.7,
        }
    }
}

/// Database access for entry operations
#[derive(Clone)]
pub struct EntryDb {
    pool: SqlitePool,
}

impl EntryDb {
    /// Create a new EntryDb instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an entry, or touch the existing row holding the same content
    ///
    /// `content_hash` is the dedup key: a hash hit advances `accessed_at` on
    /// the existing row instead of creating a second one. Returns the entry
    /// id and whether a new row was inserted.
    pub async fn insert_or_touch(
        &self,
        content_hash: &str,
        ciphertext: &[u8],
        nonce: &[u8],
        content_type: &str,
        content_len: i64,
    ) -> Result<(i64, bool), sqlx::Error> {
        let existing: Option<(i64,)> = sqlx::query_as(sql::SQL_SELECT_ID_BY_HASH)
            .bind(content_hash)
            .fetch_optional(&self.pool)
            .await?;

        if let Some((id,)) = existing {
            sqlx::query(sql::SQL_TOUCH_ENTRY)
                .bind(content_hash)
                .execute(&self.pool)
                .await?;
            return Ok((id, false));
        }

        let result = sqlx::query(sql::SQL_INSERT_ENTRY)
            .bind(content_hash)
            .bind(ciphertext)
            .bind(nonce)
            .bind(content_type)
            .bind(content_len)
            .execute(&self.pool)
            .await?;

        Ok((result.last_insert_rowid(), true))
    }

    /// Advance `accessed_at` on the entry holding this content
    ///
    /// Restores count as access, so a restored entry moves to the front of
    /// the recency ordering. Returns false if no entry holds the hash.
    pub async fn touch(&self, content_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(sql::SQL_TOUCH_ENTRY)
            .bind(content_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get the most recently accessed entries (newest first)
    pub async fn get_recent(&self, limit: u32) -> Result<Vec<Entry>, sqlx::Error> {
        let rows: Vec<EntryRow> = sqlx::query_as(sql::SQL_SELECT_RECENT_ENTRIES)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }

    /// Get a single entry by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Entry>, sqlx::Error> {
        let row: Option<EntryRow> = sqlx::query_as(sql::SQL_SELECT_ENTRY_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Entry::from))
    }

    /// Delete an entry by ID
    ///
    /// Returns true if the entry was deleted, false if it didn't exist.
    pub async fn delete_entry(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(sql::SQL_DELETE_ENTRY)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all entries
    ///
    /// Returns the number of entries removed.
    pub async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(sql::SQL_DELETE_ALL_ENTRIES)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete all but the `max` most recently accessed entries
    ///
    /// Returns the number of entries removed.
    pub async fn prune_by_count(&self, max: u32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(sql::SQL_PRUNE_BY_COUNT)
            .bind(max)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete entries created more than `days` days ago
    ///
    /// Returns the number of entries removed.
    pub async fn prune_by_age(&self, days: u32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(sql::SQL_PRUNE_BY_AGE)
            .bind(days)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count all entries
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(sql::SQL_COUNT_ENTRIES)
            .fetch_one(&self.pool)
            .await
    }
}
