//! Shared test utilities for daemon tests

use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::clipboard::Clipboard;

/// In-memory clipboard for tests
///
/// Tests simulate a user copy with `set_contents` and inspect what the
/// daemon wrote through `writes`. Clones share the same cell, so a test can
/// keep a handle after moving one into the daemon.
#[derive(Clone, Default)]
pub struct ScriptedClipboard {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    contents: Mutex<String>,
    writes: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
}

impl ScriptedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user copying text
    pub fn set_contents(&self, text: &str) {
        *self.inner.contents.lock().unwrap() = text.to_string();
    }

    /// Current clipboard text
    pub fn contents(&self) -> String {
        self.inner.contents.lock().unwrap().clone()
    }

    /// Everything the daemon has written, in order
    pub fn writes(&self) -> Vec<String> {
        self.inner.writes.lock().unwrap().clone()
    }

    /// Make subsequent reads fail until cleared
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl Clipboard for ScriptedClipboard {
    async fn read(&self) -> io::Result<String> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::other("scripted read failure"));
        }
        Ok(self.contents())
    }

    async fn write(&self, text: &str) -> io::Result<()> {
        self.set_contents(text);
        self.inner.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
