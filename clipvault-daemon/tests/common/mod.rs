//! Shared helpers for daemon integration tests

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;
use tokio::io::BufReader;
use tokio::net::UnixStream;
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};

use clipvault_common::config::VaultConfig;
use clipvault_common::framing::{FrameReader, FrameWriter};
use clipvault_common::io::{read_server_message, send_client_message};
use clipvault_common::protocol::{ClientMessage, CommandAction, HistoryItem, ServerMessage};
use clipvault_daemon::clipboard::Clipboard;
use clipvault_daemon::daemon::Daemon;
use clipvault_daemon::{config, db, paths};

/// Key used by tests instead of the OS keychain
pub const TEST_KEY: [u8; 32] = [42u8; 32];

/// Short wipe delay so countdown tests finish quickly
pub fn fast_config() -> VaultConfig {
    VaultConfig {
        wipe_delay: 1,
        poll_interval: 50,
        ..VaultConfig::default()
    }
}

/// Long wipe delay so the countdown never expires mid-test
pub fn slow_wipe_config() -> VaultConfig {
    VaultConfig {
        wipe_delay: 60,
        poll_interval: 50,
        ..VaultConfig::default()
    }
}

// ============================================================================
// Scripted Clipboard
// ============================================================================

/// In-memory clipboard driven by the tests
///
/// `set_contents` simulates a user copy; `writes` records everything the
/// daemon wrote back. Clones share the same cell.
#[derive(Clone, Default)]
pub struct ScriptedClipboard {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    contents: Mutex<String>,
    writes: Mutex<Vec<String>>,
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
}

impl Clipboard for ScriptedClipboard {
    async fn read(&self) -> io::Result<String> {
        Ok(self.contents())
    }

    async fn write(&self, text: &str) -> io::Result<()> {
        self.set_contents(text);
        self.inner.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ============================================================================
// Daemon Fixture
// ============================================================================

/// A daemon running against a scripted clipboard in a temp data directory
pub struct TestDaemon {
    temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub socket_path: PathBuf,
    pub clipboard: ScriptedClipboard,
    task: JoinHandle<()>,
}

/// Start a daemon in a fresh temp data directory
pub async fn start_daemon(config: &VaultConfig) -> TestDaemon {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    start_daemon_in(temp_dir, config).await
}

/// Start a daemon inside an existing data directory, seeding its config file
pub async fn start_daemon_in(temp_dir: TempDir, config: &VaultConfig) -> TestDaemon {
    let data_dir = temp_dir.path().to_path_buf();
    config::save(&paths::config_path(&data_dir), config).unwrap();

    let clipboard = ScriptedClipboard::new();
    let daemon = Daemon::start(&data_dir, TEST_KEY, Arc::new(clipboard.clone()), false)
        .await
        .expect("daemon failed to start");
    let socket_path = paths::socket_path(&data_dir);
    let task = tokio::spawn(daemon.run());

    TestDaemon {
        temp_dir,
        data_dir,
        socket_path,
        clipboard,
        task,
    }
}

pub type TestReader = FrameReader<BufReader<tokio::io::ReadHalf<UnixStream>>>;
pub type TestWriter = FrameWriter<tokio::io::WriteHalf<UnixStream>>;

impl TestDaemon {
    /// Connect a client and consume the hello frame
    pub async fn connect(&self) -> (TestReader, TestWriter) {
        let socket = UnixStream::connect(&self.socket_path).await.unwrap();
        let (reader, writer) = tokio::io::split(socket);
        let mut reader = FrameReader::new(BufReader::new(reader));
        let writer = FrameWriter::new(writer);

        match next_message(&mut reader).await {
            ServerMessage::Hello { .. } => {}
            other => panic!("expected hello, got {other:?}"),
        }

        (reader, writer)
    }

    /// Ask the daemon to quit and wait for it to finish shutting down
    ///
    /// Returns the data directory so a test can start a second daemon over
    /// the same files.
    pub async fn quit(self) -> TempDir {
        let (_reader, mut writer) = self.connect().await;
        send_command(&mut writer, CommandAction::Quit).await;

        let TestDaemon { temp_dir, task, .. } = self;
        timeout(Duration::from_secs(5), task)
            .await
            .expect("daemon should stop after quit")
            .unwrap();
        temp_dir
    }
}

/// Open a second handle onto a running daemon's database
///
/// WAL mode lets the test read and backdate rows while the daemon holds its
/// own pool on the same file.
pub async fn open_store(data_dir: &Path) -> SqlitePool {
    db::init_db(&paths::db_path(data_dir))
        .await
        .expect("failed to open the daemon's database")
}

// ============================================================================
// Wire Helpers
// ============================================================================

/// Fields of one state broadcast
pub struct StateFrame {
    pub countdown: Option<u64>,
    pub paused: bool,
    pub history: Vec<HistoryItem>,
    pub entry_count: i64,
}

/// Next server message, failing the test if none arrives in time
pub async fn next_message(reader: &mut TestReader) -> ServerMessage {
    timeout(Duration::from_secs(5), read_server_message(reader))
        .await
        .expect("timed out waiting for server message")
        .unwrap()
        .expect("connection closed")
}

/// Read messages until the next state broadcast
pub async fn next_state(reader: &mut TestReader) -> StateFrame {
    loop {
        if let ServerMessage::State {
            countdown,
            paused,
            history,
            entry_count,
        } = next_message(reader).await
        {
            return StateFrame {
                countdown,
                paused,
                history,
                entry_count,
            };
        }
    }
}

/// Read state broadcasts until one matches the predicate
pub async fn wait_for_state<F>(reader: &mut TestReader, mut matches: F) -> StateFrame
where
    F: FnMut(&StateFrame) -> bool,
{
    loop {
        let state = next_state(reader).await;
        if matches(&state) {
            return state;
        }
    }
}

/// Poll briefly for a message, returning None if the daemon stays quiet
pub async fn maybe_message(reader: &mut TestReader, wait: Duration) -> Option<ServerMessage> {
    match timeout(wait, read_server_message(reader)).await {
        Ok(result) => result.unwrap(),
        Err(_) => None,
    }
}

/// Send a command that carries no id or config
pub async fn send_command(writer: &mut TestWriter, action: CommandAction) {
    let message = ClientMessage::Command {
        action,
        id: None,
        config: None,
    };
    send_client_message(writer, &message).await.unwrap();
}

/// Send a command aimed at a specific entry
pub async fn send_entry_command(writer: &mut TestWriter, action: CommandAction, id: i64) {
    let message = ClientMessage::Command {
        action,
        id: Some(id),
        config: None,
    };
    send_client_message(writer, &message).await.unwrap();
}
