//! SQL query constants for database operations
//!
//! This module contains all SQL queries used by the database layer.
//! Each query is documented with its parameters and special behaviors.

// ========================================================================
// Schema
// ========================================================================

/// Create the entries table
///
/// `content_hash` is the SHA-256 hex of the plaintext and carries a UNIQUE
/// constraint: the same clipboard text never occupies two rows. Ciphertext
/// and nonce are stored as separate blobs; `content_len` is the plaintext
/// length in characters, kept unencrypted for previews and stats.
pub const SQL_CREATE_ENTRIES_TABLE: &str = "CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_hash TEXT UNIQUE NOT NULL,
    ciphertext BLOB NOT NULL,
    nonce BLOB NOT NULL,
    content_type TEXT NOT NULL DEFAULT 'text',
    content_len INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    accessed_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Create the meta table (schema versioning)
pub const SQL_CREATE_META_TABLE: &str = "CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT
)";

/// Record the schema version, leaving an existing value untouched
///
/// **Parameters:**
/// 1. `version: &str` - Schema version to write on first create
pub const SQL_INIT_SCHEMA_VERSION: &str =
    "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?)";

// ========================================================================
// Entry Query Operations
// ========================================================================

/// Insert a new entry
///
/// **Parameters:**
/// 1. `content_hash: &str` - SHA-256 hex of the plaintext
/// 2. `ciphertext: &[u8]` - Encrypted content
/// 3. `nonce: &[u8]` - Per-encryption random nonce
/// 4. `content_type: &str` - Content type (currently always "text")
/// 5. `content_len: i64` - Plaintext length in characters
///
/// **Note:** `created_at` and `accessed_at` default to `datetime('now')`.
pub const SQL_INSERT_ENTRY: &str = "INSERT INTO entries (content_hash, ciphertext, nonce, content_type, content_len) VALUES (?, ?, ?, ?, ?)";

/// Advance an entry's accessed time to now
///
/// **Parameters:**
/// 1. `content_hash: &str` - Hash of the entry to touch
pub const SQL_TOUCH_ENTRY: &str =
    "UPDATE entries SET accessed_at = datetime('now') WHERE content_hash = ?";

/// Find an entry id by content hash
///
/// **Parameters:**
/// 1. `content_hash: &str` - Hash to look up
///
/// **Returns:** `(id: i64)`
pub const SQL_SELECT_ID_BY_HASH: &str = "SELECT id FROM entries WHERE content_hash = ?";

/// Select the most recently accessed entries
///
/// **Parameters:**
/// 1. `limit: u32` - Maximum number of rows to return
///
/// **Returns:** Multiple rows of `(id, content_hash, ciphertext, nonce, content_type, content_len, created_at, accessed_at)`
pub const SQL_SELECT_RECENT_ENTRIES: &str = "SELECT id, content_hash, ciphertext, nonce, content_type, content_len, created_at, accessed_at FROM entries ORDER BY accessed_at DESC LIMIT ?";

/// Select a single entry by ID
///
/// **Parameters:**
/// 1. `id: i64` - Entry ID to look up
///
/// **Returns:** `(id, content_hash, ciphertext, nonce, content_type, content_len, created_at, accessed_at)`
pub const SQL_SELECT_ENTRY_BY_ID: &str = "SELECT id, content_hash, ciphertext, nonce, content_type, content_len, created_at, accessed_at FROM entries WHERE id = ?";

/// Delete an entry by ID
///
/// **Parameters:**
/// 1. `id: i64` - Entry ID to delete
pub const SQL_DELETE_ENTRY: &str = "DELETE FROM entries WHERE id = ?";

/// Delete all entries
///
/// **Parameters:** None
pub const SQL_DELETE_ALL_ENTRIES: &str = "DELETE FROM entries";

/// Count all entries
///
/// **Parameters:** None
///
/// **Returns:** `(count: i64)`
pub const SQL_COUNT_ENTRIES: &str = "SELECT COUNT(*) FROM entries";

// ========================================================================
// Retention Query Operations
// ========================================================================

/// Delete all but the most recently accessed entries
///
/// **Parameters:**
/// 1. `max: u32` - Number of entries to keep
///
/// **Note:** Keeps the `max` entries with the newest `accessed_at`, so a
/// frequently restored old entry survives count-based pruning.
pub const SQL_PRUNE_BY_COUNT: &str = "DELETE FROM entries WHERE id NOT IN (
    SELECT id FROM entries ORDER BY accessed_at DESC LIMIT ?
)";

/// Delete entries older than a number of days
///
/// **Parameters:**
/// 1. `days: u32` - Maximum age in days
///
/// **Note:** Compares `created_at`, not `accessed_at`: an entry captured
/// long ago is removed even if it was restored recently.
pub const SQL_PRUNE_BY_AGE: &str =
    "DELETE FROM entries WHERE created_at < datetime('now', '-' || ? || ' days')";

// ========================================================================
// Maintenance Query Operations
// ========================================================================

/// Run SQLite's integrity check
///
/// **Parameters:** None
///
/// **Returns:** `(result: String)` - "ok" when the database is healthy
pub const SQL_INTEGRITY_CHECK: &str = "PRAGMA integrity_check";
