//! Clipvault Common Library
//!
//! Shared types, wire protocol, and framing for the clipvault daemon and its
//! front-end clients.

pub mod config;
pub mod framing;
pub mod hash;
pub mod io;
pub mod protocol;

/// Version of the IPC protocol sent in the `hello` frame
pub const PROTOCOL_VERSION: &str = "0.1.0";

/// Name of the data directory created under the user's home directory
pub const DATA_DIR_NAME: &str = ".clipvault";

/// Configuration file name inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// History database file name inside the data directory
pub const DB_FILE_NAME: &str = "clipvault.db";

/// IPC socket file name inside the data directory
pub const SOCKET_FILE_NAME: &str = "clipvault.sock";

/// Preview shown for an entry whose ciphertext no longer decrypts.
///
/// Clients render this literal string; the entry itself stays in history so
/// the user can still delete it.
pub const DECRYPTION_FAILED_PREVIEW: &str = "[decryption failed]";
