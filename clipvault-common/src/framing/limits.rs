//! Frame length limits
//!
//! A line limit bounds how much memory one peer can pin before the reader
//! gives up on it. The limit only needs to clear the largest legitimate
//! frame: a `state` broadcast carrying a full history window.

use crate::config::{DEFAULT_HISTORY_DISPLAY_COUNT, DEFAULT_PREVIEW_LENGTH};

/// JSON overhead per serialized history item, excluding the preview text:
/// `{"id":...,"preview":"","contentLength":...,"createdAt":"...","accessedAt":"..."},`
/// Two integers at up to 20 digits, two 19-character timestamps, field names
/// and punctuation round up to 160 bytes.
const HISTORY_ITEM_BASE: usize = 160;

/// Worst-case bytes for one preview character once JSON-escaped (`\uXXXX`)
const ESCAPED_CHAR_SIZE: usize = 6;

/// Base overhead for a `state` frame with an empty history array:
/// `{"type":"state","countdown":...,"paused":false,"history":[],"entryCount":...}`
const STATE_BASE: usize = 128;

/// Serialized size of a `state` frame at the default display settings
const fn default_state_frame_size() -> usize {
    STATE_BASE
        + DEFAULT_HISTORY_DISPLAY_COUNT as usize
            * (HISTORY_ITEM_BASE + DEFAULT_PREVIEW_LENGTH * ESCAPED_CHAR_SIZE)
}

/// Maximum accepted line length in bytes (1 MiB).
///
/// This clears the default-sized `state` frame by two orders of magnitude,
/// leaving room for clients that raise `historyDisplayCount` and
/// `previewLength` well past the defaults. Command frames are a few hundred
/// bytes at most.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;
