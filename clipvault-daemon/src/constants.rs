//! Daemon constants

use std::time::Duration;

// Keychain identity for the vault encryption key
pub const KEYCHAIN_SERVICE: &str = "com.clipvault.encryption";
pub const KEYCHAIN_ACCOUNT: &str = "clipvault-key";

// Timer cadences
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

// Startup messages
pub const MSG_BANNER: &str = "clipvaultd v";
pub const MSG_DATA_DIR: &str = "Data directory: ";
pub const MSG_DATABASE: &str = "Database: ";
pub const MSG_INTEGRITY_OK: &str = "Database integrity: ok";
pub const MSG_KEY_CREATED: &str = "Generated new encryption key in system keychain";
pub const MSG_KEY_READY: &str = "Encryption key ready";
pub const MSG_LISTENING: &str = "Listening on ";
pub const MSG_MONITOR_STARTED: &str = "Clipboard monitor started";
pub const MSG_CLEANUP_STARTED: &str = "Cleanup scheduler started";
pub const MSG_READY: &str = "Daemon ready";
pub const MSG_SHUTDOWN_RECEIVED: &str = "Shutdown signal received, stopping daemon...";
pub const MSG_SHUTDOWN_COMPLETE: &str = "Daemon stopped";
pub const MSG_CONFIG_CREATED: &str = "Created default config: ";
pub const MSG_CLEANUP_PRUNED: &str = "Cleanup pruned entries: ";
pub const MSG_CLIPBOARD_WIPED: &str = "Clipboard wiped after countdown";

// Debug messages
pub const MSG_CLIENT_CONNECTED: &str = "Client connected: session ";
pub const MSG_CLIENT_DISCONNECTED: &str = "Client disconnected: session ";
pub const MSG_CAPTURED: &str = "Captured clipboard entry: ";
pub const MSG_SUPPRESSED: &str = "Suppressed restored clipboard content: ";
pub const MSG_COMMAND: &str = "Command from session ";

// Error messages
pub const ERR_GENERIC: &str = "Error: ";
pub const ERR_CONFIG_LOAD: &str = "Failed to load config: ";
pub const ERR_CONFIG_SAVE: &str = "Failed to save config: ";
pub const ERR_DATABASE_INIT: &str = "Failed to initialize database: ";
pub const ERR_DATABASE_INTEGRITY: &str = "Database integrity check failed: ";
pub const ERR_KEY_INIT: &str = "Failed to obtain encryption key: ";
pub const ERR_BIND_FAILED: &str = "Failed to bind socket: ";
pub const ERR_SOCKET_IN_USE: &str = "Another daemon is already running on ";
pub const ERR_SET_PERMISSIONS: &str = "Failed to set socket permissions: ";
pub const ERR_ACCEPT: &str = "Failed to accept connection: ";
pub const ERR_CLIPBOARD_WRITE: &str = "Failed to write clipboard: ";
pub const ERR_CLIPBOARD_CLEAR: &str = "Failed to clear clipboard: ";
pub const ERR_ENCRYPT: &str = "Failed to encrypt entry: ";
pub const ERR_DECRYPT_ENTRY: &str = "Failed to decrypt entry ";
pub const ERR_STORE: &str = "Storage error: ";
pub const ERR_CLEANUP: &str = "Cleanup sweep failed: ";
pub const ERR_SIGNAL_SIGTERM: &str = "Failed to register SIGTERM handler";
pub const ERR_SIGNAL_SIGINT: &str = "Failed to register SIGINT handler";
pub const ERR_SIGNAL_CTRLC: &str = "Failed to register Ctrl+C handler";
