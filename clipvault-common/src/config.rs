//! Daemon configuration shared across the IPC boundary
//!
//! The daemon persists this document as pretty-printed JSON in the data
//! directory. Clients receive the full config in a `config` frame and send
//! partial updates with the `update_config` command. Field names serialize
//! in camelCase to match the config file and wire format.

use serde::{Deserialize, Serialize};

/// Seconds an armed countdown waits before wiping the clipboard
pub const DEFAULT_WIPE_DELAY: u64 = 5;

/// Characters kept from a single clipboard capture before truncation
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 10_000;

/// Rows kept in history before count-based pruning removes the oldest
pub const DEFAULT_MAX_HISTORY_ENTRIES: u32 = 1_000;

/// Days an entry may age before time-based pruning removes it
pub const DEFAULT_MAX_HISTORY_AGE: u32 = 30;

/// Milliseconds between clipboard polls
pub const DEFAULT_POLL_INTERVAL: u64 = 500;

/// Entries included in each state broadcast
pub const DEFAULT_HISTORY_DISPLAY_COUNT: u32 = 20;

/// Characters of plaintext shown per history preview
pub const DEFAULT_PREVIEW_LENGTH: usize = 50;

/// Lowest accepted wipe delay in seconds
pub const MIN_WIPE_DELAY: u64 = 1;

/// Lowest accepted capture length in characters
pub const MIN_CONTENT_LENGTH: usize = 1;

/// Lowest accepted count-based retention limit
pub const MIN_HISTORY_ENTRIES: u32 = 1;

/// Lowest accepted age-based retention limit in days
pub const MIN_HISTORY_AGE: u32 = 1;

/// Lowest accepted poll interval in milliseconds
pub const MIN_POLL_INTERVAL: u64 = 50;

/// Lowest accepted broadcast entry count
pub const MIN_HISTORY_DISPLAY_COUNT: u32 = 1;

/// Lowest accepted preview length in characters
pub const MIN_PREVIEW_LENGTH: usize = 1;

/// Daemon configuration document.
///
/// Every field falls back to its default when missing, so a config file from
/// an older version (or an empty `{}`) always loads. Unknown fields are
/// ignored on read and dropped on the next save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    /// Seconds before an armed countdown wipes the clipboard
    #[serde(default = "default_wipe_delay")]
    pub wipe_delay: u64,
    /// Captured plaintext is truncated to this many characters
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
    /// Count-based retention limit
    #[serde(default = "default_max_history_entries")]
    pub max_history_entries: u32,
    /// Age-based retention limit in days
    #[serde(default = "default_max_history_age")]
    pub max_history_age: u32,
    /// Clipboard poll interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Entries included in each state broadcast
    #[serde(default = "default_history_display_count")]
    pub history_display_count: u32,
    /// Preview length in characters
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
}

fn default_wipe_delay() -> u64 {
    DEFAULT_WIPE_DELAY
}

fn default_max_content_length() -> usize {
    DEFAULT_MAX_CONTENT_LENGTH
}

fn default_max_history_entries() -> u32 {
    DEFAULT_MAX_HISTORY_ENTRIES
}

fn default_max_history_age() -> u32 {
    DEFAULT_MAX_HISTORY_AGE
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL
}

fn default_history_display_count() -> u32 {
    DEFAULT_HISTORY_DISPLAY_COUNT
}

fn default_preview_length() -> usize {
    DEFAULT_PREVIEW_LENGTH
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            wipe_delay: DEFAULT_WIPE_DELAY,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_history_entries: DEFAULT_MAX_HISTORY_ENTRIES,
            max_history_age: DEFAULT_MAX_HISTORY_AGE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            history_display_count: DEFAULT_HISTORY_DISPLAY_COUNT,
            preview_length: DEFAULT_PREVIEW_LENGTH,
        }
    }
}

impl VaultConfig {
    /// Merge a partial update over the current values.
    ///
    /// Fields absent from the patch keep their current value. Call
    /// [`sanitize`](Self::sanitize) afterwards before persisting.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(wipe_delay) = patch.wipe_delay {
            self.wipe_delay = wipe_delay;
        }
        if let Some(max_content_length) = patch.max_content_length {
            self.max_content_length = max_content_length;
        }
        if let Some(max_history_entries) = patch.max_history_entries {
            self.max_history_entries = max_history_entries;
        }
        if let Some(max_history_age) = patch.max_history_age {
            self.max_history_age = max_history_age;
        }
        if let Some(poll_interval) = patch.poll_interval {
            self.poll_interval = poll_interval;
        }
        if let Some(history_display_count) = patch.history_display_count {
            self.history_display_count = history_display_count;
        }
        if let Some(preview_length) = patch.preview_length {
            self.preview_length = preview_length;
        }
    }

    /// Raise out-of-range values to their minimums.
    ///
    /// Applied after loading the config file and after every `update_config`
    /// merge. Values below the minimums are raised silently, never rejected.
    pub fn sanitize(&mut self) {
        self.wipe_delay = self.wipe_delay.max(MIN_WIPE_DELAY);
        self.max_content_length = self.max_content_length.max(MIN_CONTENT_LENGTH);
        self.max_history_entries = self.max_history_entries.max(MIN_HISTORY_ENTRIES);
        self.max_history_age = self.max_history_age.max(MIN_HISTORY_AGE);
        self.poll_interval = self.poll_interval.max(MIN_POLL_INTERVAL);
        self.history_display_count = self.history_display_count.max(MIN_HISTORY_DISPLAY_COUNT);
        self.preview_length = self.preview_length.max(MIN_PREVIEW_LENGTH);
    }
}

/// Partial configuration carried by an `update_config` command.
///
/// Absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wipe_delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_content_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_history_entries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_history_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_display_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_length: Option<usize>,
}
