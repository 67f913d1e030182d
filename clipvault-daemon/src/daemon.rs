//! Daemon orchestration
//!
//! Owns every component and runs the single event loop that performs all
//! state mutation. The monitor, wiper, and IPC connections only send events;
//! side effects (store writes, clipboard writes, broadcasts) happen here, in
//! arrival order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use clipvault_common::DECRYPTION_FAILED_PREVIEW;
use clipvault_common::config::{ConfigPatch, VaultConfig};
use clipvault_common::hash::sha256_hex;
use clipvault_common::protocol::{ClientMessage, CommandAction, HistoryItem, ServerMessage};

use crate::cleanup::CleanupScheduler;
use crate::clipboard::Clipboard;
use crate::config;
use crate::constants::{
    ERR_CLIPBOARD_CLEAR, ERR_CLIPBOARD_WRITE, ERR_CONFIG_SAVE, ERR_DATABASE_INIT,
    ERR_DATABASE_INTEGRITY, ERR_DECRYPT_ENTRY, ERR_ENCRYPT, ERR_SET_PERMISSIONS,
    ERR_SIGNAL_CTRLC, ERR_SIGNAL_SIGINT, ERR_SIGNAL_SIGTERM, ERR_STORE, MSG_CAPTURED,
    MSG_CLEANUP_STARTED, MSG_CLIPBOARD_WIPED, MSG_COMMAND, MSG_DATABASE, MSG_INTEGRITY_OK,
    MSG_KEY_READY, MSG_LISTENING, MSG_MONITOR_STARTED, MSG_READY, MSG_SHUTDOWN_RECEIVED,
};
use crate::crypto::ClipCrypto;
use crate::db::{self, Database, Entry};
use crate::ipc::{IpcServer, SessionMap};
use crate::monitor::ClipboardMonitor;
use crate::paths;
use crate::wiper::{Wiper, WiperState};

/// Events consumed by the daemon's run loop
///
/// Everything that mutates daemon state funnels through one channel, so
/// capture, tick, and command handling never interleave.
#[derive(Debug)]
pub enum DaemonEvent {
    /// New clipboard content observed by the monitor
    ClipboardChange { content: String, hash: String },
    /// Countdown state changed; carries the snapshot taken at emit time
    WiperTick(WiperState),
    /// Countdown reached zero; the clipboard must be cleared
    WipeFired,
    /// A client command, tagged with the issuing session
    Command {
        message: ClientMessage,
        session_id: u32,
    },
}

/// The clipvault daemon
pub struct Daemon<C: Clipboard> {
    config: VaultConfig,
    config_path: PathBuf,
    db: Database,
    crypto: ClipCrypto,
    clipboard: Arc<C>,
    monitor: ClipboardMonitor,
    wiper: Wiper,
    cleanup: CleanupScheduler,
    ipc: IpcServer,
    sessions: SessionMap,
    events: mpsc::UnboundedReceiver<DaemonEvent>,
    debug: bool,
}

impl<C: Clipboard> Daemon<C> {
    /// Bring up every component in dependency order.
    ///
    /// Config and store first, then the IPC server, and only then the
    /// clipboard monitor and cleanup scheduler, so the earliest broadcasts
    /// already have somewhere to go. The encryption key is resolved by the
    /// caller (keychain for the binary, a fixed key in tests).
    ///
    /// # Errors
    ///
    /// Returns a printable diagnostic if any component fails to start;
    /// startup failures are fatal.
    pub async fn start(
        data_dir: &Path,
        key: [u8; 32],
        clipboard: Arc<C>,
        debug: bool,
    ) -> Result<Self, String> {
        let config_path = paths::config_path(data_dir);
        let config = config::load_or_create(&config_path)
            .map_err(|e| format!("{}{}", ERR_CONFIG_SAVE, e))?;

        let db_path = paths::db_path(data_dir);
        let pool = db::init_db(&db_path)
            .await
            .map_err(|e| format!("{}{}", ERR_DATABASE_INIT, e))?;
        println!("{}{}", MSG_DATABASE, db_path.display());

        #[cfg(unix)]
        paths::set_secure_permissions(&db_path)
            .map_err(|e| format!("{}{}", ERR_SET_PERMISSIONS, e))?;

        let db = Database::new(pool);
        match db.check_integrity().await {
            Ok(true) => println!("{}", MSG_INTEGRITY_OK),
            Ok(false) => eprintln!("{}{}", ERR_DATABASE_INTEGRITY, "integrity_check reported errors"),
            Err(e) => eprintln!("{}{}", ERR_DATABASE_INTEGRITY, e),
        }

        let crypto = ClipCrypto::new(&key);
        println!("{}", MSG_KEY_READY);

        let sessions = SessionMap::new();
        let (event_tx, events) = mpsc::unbounded_channel();

        let socket_path = paths::socket_path(data_dir);
        let ipc = IpcServer::start(&socket_path, sessions.clone(), event_tx.clone(), debug).await?;
        println!("{}{}", MSG_LISTENING, socket_path.display());

        let wiper = Wiper::new(config.wipe_delay, event_tx.clone());

        let monitor =
            ClipboardMonitor::start(Arc::clone(&clipboard), config.poll_interval, event_tx, debug);
        println!("{}", MSG_MONITOR_STARTED);

        let cleanup = CleanupScheduler::start(
            db.entries.clone(),
            config.max_history_age,
            config.max_history_entries,
        );
        println!("{}", MSG_CLEANUP_STARTED);

        println!("{}", MSG_READY);

        Ok(Self {
            config,
            config_path,
            db,
            crypto,
            clipboard,
            monitor,
            wiper,
            cleanup,
            ipc,
            sessions,
            events,
            debug,
        })
    }

    /// Consume events until a `quit` command or a shutdown signal, then tear
    /// everything down in reverse startup order.
    pub async fn run(mut self) {
        let shutdown = setup_shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    println!("{}", MSG_SHUTDOWN_RECEIVED);
                    break;
                }
                event = self.events.recv() => {
                    match event {
                        Some(event) => {
                            if self.handle_event(event).await {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        self.shutdown().await;
    }

    /// Reverse startup order, so nothing emits into a torn-down daemon
    async fn shutdown(&mut self) {
        self.monitor.stop();
        self.wiper.stop_countdown();
        self.cleanup.stop();
        self.ipc.stop(&self.sessions).await;
        self.db.close().await;
    }

    /// Returns true when the daemon should quit
    async fn handle_event(&mut self, event: DaemonEvent) -> bool {
        match event {
            DaemonEvent::ClipboardChange { content, hash } => {
                self.handle_clipboard_change(content, hash).await;
            }
            DaemonEvent::WiperTick(state) => {
                // Use the snapshot, not live state: the countdown may already
                // have moved on (or been cleared by the wipe)
                self.broadcast_state_snapshot(state).await;
            }
            DaemonEvent::WipeFired => {
                self.handle_wipe().await;
            }
            DaemonEvent::Command {
                message,
                session_id,
            } => {
                return self.handle_command(message, session_id).await;
            }
        }
        false
    }

    async fn handle_clipboard_change(&mut self, content: String, hash: String) {
        let truncated = truncate_chars(&content, self.config.max_content_length);
        let content_len = truncated.chars().count() as i64;

        let (ciphertext, nonce) = match self.crypto.encrypt(truncated) {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("{}{}", ERR_ENCRYPT, e);
                return;
            }
        };

        match self
            .db
            .entries
            .insert_or_touch(&hash, &ciphertext, &nonce, "text", content_len)
            .await
        {
            Ok((id, _)) => {
                if self.debug {
                    println!("{}{}", MSG_CAPTURED, id);
                }
            }
            Err(e) => {
                eprintln!("{}{}", ERR_STORE, e);
                return;
            }
        }

        self.wiper.start_countdown();
        self.broadcast_state().await;
    }

    async fn handle_wipe(&self) {
        if let Err(e) = self.clipboard.write("").await {
            eprintln!("{}{}", ERR_CLIPBOARD_CLEAR, e);
        }
        println!("{}", MSG_CLIPBOARD_WIPED);
        self.broadcast_state().await;
    }

    /// Returns true when the command asks the daemon to quit
    async fn handle_command(&mut self, message: ClientMessage, session_id: u32) -> bool {
        let ClientMessage::Command { action, id, config } = message;

        if self.debug {
            println!("{}{}: {:?}", MSG_COMMAND, session_id, action);
        }

        match action {
            CommandAction::ClearClipboard => {
                if let Err(e) = self.clipboard.write("").await {
                    eprintln!("{}{}", ERR_CLIPBOARD_CLEAR, e);
                }
                self.wiper.stop_countdown();
                self.broadcast_state().await;
            }
            // Pause/resume emit a tick event, which drives the broadcast
            CommandAction::PauseCountdown => self.wiper.pause(),
            CommandAction::ResumeCountdown => self.wiper.resume(),
            CommandAction::DeleteEntry => {
                if let Some(id) = id {
                    match self.db.entries.delete_entry(id).await {
                        Ok(_) => self.broadcast_state().await,
                        Err(e) => eprintln!("{}{}", ERR_STORE, e),
                    }
                }
            }
            CommandAction::CopyEntry => {
                if let Some(id) = id {
                    self.handle_copy_entry(id, session_id).await;
                }
            }
            CommandAction::ClearHistory => match self.db.entries.delete_all().await {
                Ok(_) => self.broadcast_state().await,
                Err(e) => eprintln!("{}{}", ERR_STORE, e),
            },
            CommandAction::GetConfig => {
                let reply = ServerMessage::Config {
                    config: self.config.clone(),
                };
                self.sessions.send_to(session_id, reply).await;
            }
            CommandAction::UpdateConfig => {
                if let Some(patch) = config {
                    self.handle_update_config(&patch).await;
                }
            }
            CommandAction::Quit => return true,
        }

        false
    }

    /// Decrypt an entry back onto the clipboard.
    ///
    /// An unknown id is a silent no-op. A decryption failure answers only
    /// the requesting session with an error frame; other clients see nothing.
    async fn handle_copy_entry(&mut self, id: i64, session_id: u32) {
        let entry = match self.db.entries.get_by_id(id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return,
            Err(e) => {
                eprintln!("{}{}", ERR_STORE, e);
                return;
            }
        };

        let plaintext = match self.crypto.decrypt(&entry.ciphertext, &entry.nonce) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                eprintln!("{}{}: {}", ERR_DECRYPT_ENTRY, id, e);
                let reply = ServerMessage::Error {
                    message: format!("entry {id} could not be decrypted"),
                };
                self.sessions.send_to(session_id, reply).await;
                return;
            }
        };

        // Arm suppression before the write lands, so the next poll can't
        // observe the restored content first
        let hash = sha256_hex(&plaintext);
        self.monitor.set_expected_hash(hash);

        if let Err(e) = self.clipboard.write(&plaintext).await {
            eprintln!("{}{}", ERR_CLIPBOARD_WRITE, e);
            return;
        }

        // A restore counts as access
        if let Err(e) = self.db.entries.touch(&entry.content_hash).await {
            eprintln!("{}{}", ERR_STORE, e);
        }

        self.wiper.start_countdown();
        self.broadcast_state().await;
    }

    async fn handle_update_config(&mut self, patch: &ConfigPatch) {
        self.config.apply(patch);
        self.config.sanitize();

        if let Err(e) = config::save(&self.config_path, &self.config) {
            eprintln!("{}{}", ERR_CONFIG_SAVE, e);
        }

        self.wiper.update_delay(self.config.wipe_delay);
        self.cleanup
            .update_config(self.config.max_history_age, self.config.max_history_entries);
        self.monitor.update_config(self.config.poll_interval);

        self.broadcast_state().await;
    }

    async fn broadcast_state(&self) {
        let snapshot = self.wiper.state();
        self.broadcast_state_snapshot(snapshot).await;
    }

    async fn broadcast_state_snapshot(&self, wiper: WiperState) {
        let message = self.assemble_state(wiper).await;
        self.sessions.broadcast(&message).await;
    }

    /// Build a `state` frame from the store and a wiper snapshot
    async fn assemble_state(&self, wiper: WiperState) -> ServerMessage {
        let entries = match self
            .db
            .entries
            .get_recent(self.config.history_display_count)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("{}{}", ERR_STORE, e);
                Vec::new()
            }
        };

        let history: Vec<HistoryItem> = entries
            .into_iter()
            .map(|entry| self.history_item(entry))
            .collect();

        let entry_count = match self.db.entries.count().await {
            Ok(count) => count,
            Err(e) => {
                eprintln!("{}{}", ERR_STORE, e);
                history.len() as i64
            }
        };

        ServerMessage::State {
            countdown: wiper.countdown,
            paused: wiper.paused,
            history,
            entry_count,
        }
    }

    /// One entry rendered for clients; decryption failure degrades the
    /// preview for that entry alone
    fn history_item(&self, entry: Entry) -> HistoryItem {
        let preview = match self.crypto.decrypt(&entry.ciphertext, &entry.nonce) {
            Ok(plaintext) => preview_of(&plaintext, self.config.preview_length),
            Err(e) => {
                eprintln!("{}{}: {}", ERR_DECRYPT_ENTRY, entry.id, e);
                DECRYPTION_FAILED_PREVIEW.to_string()
            }
        };

        HistoryItem {
            id: entry.id,
            preview,
            content_length: entry.content_len,
            created_at: entry.created_at,
            accessed_at: entry.accessed_at,
        }
    }
}

/// Cut `content` at `max_chars` characters, on a character boundary
fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Preview text: truncated first, then newlines normalized to spaces
fn preview_of(plaintext: &str, max_chars: usize) -> String {
    truncate_chars(plaintext, max_chars).replace('\n', " ")
}

/// Setup graceful shutdown signal handling (Ctrl+C)
async fn setup_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect(ERR_SIGNAL_SIGTERM);
        let mut sigint = signal(SignalKind::interrupt()).expect(ERR_SIGNAL_SIGINT);

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect(ERR_SIGNAL_CTRLC);
    }
}
