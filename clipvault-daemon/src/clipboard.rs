//! Clipboard access via platform utilities

use std::future::Future;
use std::io;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Abstraction over the system clipboard
///
/// The daemon only handles plain text. Futures are `Send` because reads run
/// inside the spawned monitor task.
pub trait Clipboard: Send + Sync + 'static {
    /// Read the current clipboard text
    fn read(&self) -> impl Future<Output = io::Result<String>> + Send;

    /// Replace the clipboard contents
    fn write(&self, text: &str) -> impl Future<Output = io::Result<()>> + Send;
}

#[cfg(target_os = "macos")]
const READ_COMMAND: &[&str] = &["pbpaste"];
#[cfg(target_os = "macos")]
const WRITE_COMMAND: &[&str] = &["pbcopy"];

// wl-paste appends a newline unless told otherwise
#[cfg(not(target_os = "macos"))]
const READ_COMMAND: &[&str] = &["wl-paste", "--no-newline"];
#[cfg(not(target_os = "macos"))]
const WRITE_COMMAND: &[&str] = &["wl-copy"];

/// Clipboard backed by the platform utility (pbpaste/pbcopy on macOS,
/// wl-paste/wl-copy on Wayland)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    async fn read(&self) -> io::Result<String> {
        let output = Command::new(READ_COMMAND[0])
            .args(&READ_COMMAND[1..])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(io::Error::other("clipboard read utility failed"));
        }

        // Non-text contents (images etc.) are treated as unreadable
        String::from_utf8(output.stdout)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "clipboard is not UTF-8"))
    }

    async fn write(&self, text: &str) -> io::Result<()> {
        let mut child = Command::new(WRITE_COMMAND[0])
            .args(&WRITE_COMMAND[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(io::Error::other("clipboard write utility failed"));
        }

        Ok(())
    }
}
