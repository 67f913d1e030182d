//! Clipboard change detection
//!
//! Polls the clipboard and reports new content to the daemon as
//! `(content, hash)` events. Restores performed by the daemon itself are
//! filtered out through a one-shot expected hash: the next poll that sees
//! exactly that hash consumes it silently instead of re-capturing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use clipvault_common::hash::sha256_hex;

use crate::clipboard::Clipboard;
use crate::constants::MSG_SUPPRESSED;
use crate::daemon::DaemonEvent;

/// Watches the clipboard for changes
pub struct ClipboardMonitor {
    expected_hash: Arc<Mutex<Option<String>>>,
    poll_interval: Arc<Mutex<Duration>>,
    task: Option<JoinHandle<()>>,
}

impl ClipboardMonitor {
    /// Spawn the poll task
    ///
    /// The first poll runs immediately, so whatever is on the clipboard at
    /// startup is captured as an entry.
    pub fn start<C: Clipboard>(
        clipboard: Arc<C>,
        poll_interval_ms: u64,
        tx: mpsc::UnboundedSender<DaemonEvent>,
        debug: bool,
    ) -> Self {
        let expected_hash = Arc::new(Mutex::new(None));
        let poll_interval = Arc::new(Mutex::new(Duration::from_millis(poll_interval_ms)));

        let expected = Arc::clone(&expected_hash);
        let interval = Arc::clone(&poll_interval);
        let task = tokio::spawn(async move {
            let mut last_hash: Option<String> = None;

            loop {
                poll(&clipboard, &expected, &mut last_hash, &tx, debug).await;

                let delay = *interval.lock().unwrap();
                tokio::time::sleep(delay).await;
            }
        });

        Self {
            expected_hash,
            poll_interval,
            task: Some(task),
        }
    }

    /// Register a one-shot hash to swallow on the next matching poll
    ///
    /// Used when the daemon restores an entry to the clipboard: the restore
    /// must not be re-captured as a fresh copy.
    pub fn set_expected_hash(&self, hash: String) {
        *self.expected_hash.lock().unwrap() = Some(hash);
    }

    /// Change the poll cadence for subsequent cycles
    pub fn update_config(&self, poll_interval_ms: u64) {
        *self.poll_interval.lock().unwrap() = Duration::from_millis(poll_interval_ms);
    }

    /// Abort the poll task
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll<C: Clipboard>(
    clipboard: &Arc<C>,
    expected_hash: &Arc<Mutex<Option<String>>>,
    last_hash: &mut Option<String>,
    tx: &mpsc::UnboundedSender<DaemonEvent>,
    debug: bool,
) {
    // Read failures are transient (missing utility, non-text content):
    // skip the cycle and try again on the next one
    let Ok(content) = clipboard.read().await else {
        return;
    };

    if content.is_empty() {
        *last_hash = None;
        return;
    }

    let hash = sha256_hex(&content);
    if last_hash.as_deref() == Some(hash.as_str()) {
        return;
    }
    *last_hash = Some(hash.clone());

    // One-shot suppression of the daemon's own restore
    let suppressed = {
        let mut expected = expected_hash.lock().unwrap();
        if expected.as_deref() == Some(hash.as_str()) {
            *expected = None;
            true
        } else {
            false
        }
    };
    if suppressed {
        if debug {
            println!("{}{}", MSG_SUPPRESSED, hash);
        }
        return;
    }

    let _ = tx.send(DaemonEvent::ClipboardChange { content, hash });
}
