//! Unix domain socket IPC server
//!
//! One daemon listens on a single socket inside the data directory. Each
//! client connection gets its own task and outbound queue; inbound commands
//! are forwarded to the daemon loop tagged with the session id, so handler
//! logic runs in one place regardless of which client asked.

pub mod sessions;

pub use sessions::SessionMap;

use std::path::{Path, PathBuf};

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use clipvault_common::PROTOCOL_VERSION;
use clipvault_common::framing::{FrameReader, FrameWriter};
use clipvault_common::io::{read_client_message, send_server_message};
use clipvault_common::protocol::ServerMessage;

use crate::constants::{
    ERR_ACCEPT, ERR_BIND_FAILED, ERR_SET_PERMISSIONS, ERR_SOCKET_IN_USE, MSG_CLIENT_CONNECTED,
    MSG_CLIENT_DISCONNECTED,
};
use crate::daemon::DaemonEvent;

/// Listening IPC server
///
/// Owns the accept task and the socket file; [`stop`](Self::stop) tears both
/// down. Connection tasks are tracked through the shared [`SessionMap`].
pub struct IpcServer {
    socket_path: PathBuf,
    accept_task: Option<JoinHandle<()>>,
}

impl IpcServer {
    /// Bind the socket and start accepting clients.
    ///
    /// A leftover socket file from a crashed daemon is detected by probing it
    /// with a connect: if something answers, another daemon owns the socket
    /// and startup fails; if the connect is refused, the file is stale and
    /// gets replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is in use by a live daemon or the bind
    /// fails.
    pub async fn start(
        socket_path: &Path,
        sessions: SessionMap,
        event_tx: mpsc::UnboundedSender<DaemonEvent>,
        debug: bool,
    ) -> Result<Self, String> {
        if socket_path.exists() {
            match UnixStream::connect(socket_path).await {
                Ok(_) => {
                    return Err(format!("{}{}", ERR_SOCKET_IN_USE, socket_path.display()));
                }
                Err(_) => {
                    // Nobody home: stale file from an unclean shutdown
                    let _ = std::fs::remove_file(socket_path);
                }
            }
        }

        let listener = UnixListener::bind(socket_path)
            .map_err(|e| format!("{}{}", ERR_BIND_FAILED, e))?;

        #[cfg(unix)]
        crate::paths::set_secure_permissions(socket_path)
            .map_err(|e| format!("{}{}", ERR_SET_PERMISSIONS, e))?;

        let accept_task = tokio::spawn(accept_loop(listener, sessions, event_tx, debug));

        Ok(Self {
            socket_path: socket_path.to_path_buf(),
            accept_task: Some(accept_task),
        })
    }

    /// Stop accepting connections and remove the socket file.
    ///
    /// Live connection tasks notice their outbound queue closing once the
    /// session map is cleared and exit on their own.
    pub async fn stop(&mut self, sessions: &SessionMap) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
        }
        sessions.clear().await;
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn accept_loop(
    listener: UnixListener,
    sessions: SessionMap,
    event_tx: mpsc::UnboundedSender<DaemonEvent>,
    debug: bool,
) {
    loop {
        match listener.accept().await {
            Ok((socket, _addr)) => {
                let sessions = sessions.clone();
                let event_tx = event_tx.clone();

                // Spawn a new task to handle this connection
                tokio::spawn(async move {
                    handle_connection(socket, sessions, event_tx, debug).await;
                });
            }
            Err(e) => {
                eprintln!("{}{}", ERR_ACCEPT, e);
            }
        }
    }
}

/// Handle a single client connection until it closes.
///
/// The hello frame goes out before anything else so clients can gate on the
/// protocol version. After that the loop races inbound frames against the
/// session's outbound queue.
async fn handle_connection(
    socket: UnixStream,
    sessions: SessionMap,
    event_tx: mpsc::UnboundedSender<DaemonEvent>,
    debug: bool,
) {
    let (reader, writer) = tokio::io::split(socket);
    let buf_reader = BufReader::new(reader);
    let mut frame_reader = FrameReader::new(buf_reader);
    let mut frame_writer = FrameWriter::new(writer);

    // Create channel for receiving server messages to send to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let session_id = sessions.register(tx).await;

    if debug {
        println!("{}{}", MSG_CLIENT_CONNECTED, session_id);
    }

    let hello = ServerMessage::Hello {
        version: PROTOCOL_VERSION.to_string(),
    };
    if send_server_message(&mut frame_writer, &hello).await.is_ok() {
        // Main loop - race incoming commands against queued outbound messages
        loop {
            tokio::select! {
                result = read_client_message(&mut frame_reader) => {
                    match result {
                        Ok(Some(message)) => {
                            let event = DaemonEvent::Command { message, session_id };
                            if event_tx.send(event).is_err() {
                                // Daemon loop is gone; nothing left to serve
                                break;
                            }
                        }
                        Ok(None) => {
                            // Connection closed cleanly
                            break;
                        }
                        Err(_) => {
                            break;
                        }
                    }
                }

                msg = rx.recv() => {
                    match msg {
                        Some(msg) => {
                            if send_server_message(&mut frame_writer, &msg).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            // Session was dropped from the map - disconnect
                            break;
                        }
                    }
                }
            }
        }
    }

    // Shutdown the writer gracefully
    let _ = frame_writer.get_mut().shutdown().await;

    sessions.unregister(session_id).await;

    if debug {
        println!("{}{}", MSG_CLIENT_DISCONNECTED, session_id);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tokio::time::{Duration, timeout};

    use clipvault_common::io::{read_server_message, send_client_message};
    use clipvault_common::protocol::{ClientMessage, CommandAction};

    use super::*;

    struct TestServer {
        _temp_dir: TempDir,
        socket_path: PathBuf,
        server: IpcServer,
        sessions: SessionMap,
        event_rx: mpsc::UnboundedReceiver<DaemonEvent>,
    }

    async fn start_test_server() -> TestServer {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("test.sock");
        let sessions = SessionMap::new();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let server = IpcServer::start(&socket_path, sessions.clone(), event_tx, false)
            .await
            .unwrap();

        TestServer {
            _temp_dir: temp_dir,
            socket_path,
            server,
            sessions,
            event_rx,
        }
    }

    type ClientReader = FrameReader<BufReader<tokio::io::ReadHalf<UnixStream>>>;
    type ClientWriter = FrameWriter<tokio::io::WriteHalf<UnixStream>>;

    async fn connect_client(socket_path: &Path) -> (ClientReader, ClientWriter) {
        let socket = UnixStream::connect(socket_path).await.unwrap();
        let (reader, writer) = tokio::io::split(socket);
        (
            FrameReader::new(BufReader::new(reader)),
            FrameWriter::new(writer),
        )
    }

    async fn next_server_message(reader: &mut ClientReader) -> ServerMessage {
        timeout(Duration::from_secs(3), read_server_message(reader))
            .await
            .expect("timed out waiting for server message")
            .unwrap()
            .expect("connection closed")
    }

    #[tokio::test]
    async fn test_hello_sent_first_on_connect() {
        let mut harness = start_test_server().await;
        let (mut reader, _writer) = connect_client(&harness.socket_path).await;

        let message = next_server_message(&mut reader).await;
        assert_eq!(
            message,
            ServerMessage::Hello {
                version: PROTOCOL_VERSION.to_string(),
            }
        );

        harness.server.stop(&harness.sessions).await;
    }

    #[tokio::test]
    async fn test_command_forwarded_with_session_id() {
        let mut harness = start_test_server().await;
        let (mut reader, mut writer) = connect_client(&harness.socket_path).await;
        next_server_message(&mut reader).await;

        let command = ClientMessage::Command {
            action: CommandAction::PauseCountdown,
            id: None,
            config: None,
        };
        send_client_message(&mut writer, &command).await.unwrap();

        let event = timeout(Duration::from_secs(3), harness.event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            DaemonEvent::Command { message, session_id } => {
                assert_eq!(message, command);
                assert!(session_id > 0);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        harness.server.stop(&harness.sessions).await;
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_client() {
        let mut harness = start_test_server().await;
        let (mut reader1, _w1) = connect_client(&harness.socket_path).await;
        let (mut reader2, _w2) = connect_client(&harness.socket_path).await;
        next_server_message(&mut reader1).await;
        next_server_message(&mut reader2).await;

        let notice = ServerMessage::Error {
            message: "broadcast".to_string(),
        };
        harness.sessions.broadcast(&notice).await;

        assert_eq!(next_server_message(&mut reader1).await, notice);
        assert_eq!(next_server_message(&mut reader2).await, notice);

        harness.server.stop(&harness.sessions).await;
    }

    #[tokio::test]
    async fn test_malformed_line_does_not_kill_connection() {
        let mut harness = start_test_server().await;
        let (mut reader, mut writer) = connect_client(&harness.socket_path).await;
        next_server_message(&mut reader).await;

        // Garbage first, then a real command on the same connection
        writer.write_frame(b"this is not json").await.unwrap();
        let command = ClientMessage::Command {
            action: CommandAction::Quit,
            id: None,
            config: None,
        };
        send_client_message(&mut writer, &command).await.unwrap();

        let event = timeout(Duration::from_secs(3), harness.event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            event,
            DaemonEvent::Command {
                message: ClientMessage::Command {
                    action: CommandAction::Quit,
                    ..
                },
                ..
            }
        ));

        harness.server.stop(&harness.sessions).await;
    }

    #[tokio::test]
    async fn test_disconnect_unregisters_session() {
        let mut harness = start_test_server().await;
        let (mut reader, writer) = connect_client(&harness.socket_path).await;
        next_server_message(&mut reader).await;
        assert_eq!(harness.sessions.count().await, 1);

        drop(reader);
        drop(writer);

        // Connection task notices the close and removes itself
        for _ in 0..50 {
            if harness.sessions.count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(harness.sessions.count().await, 0);

        harness.server.stop(&harness.sessions).await;
    }

    #[tokio::test]
    async fn test_stale_socket_file_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("test.sock");

        // Bind once and stop without removing, leaving a dead socket file
        {
            let listener = UnixListener::bind(&socket_path).unwrap();
            drop(listener);
        }
        assert!(socket_path.exists());

        let sessions = SessionMap::new();
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let mut server = IpcServer::start(&socket_path, sessions.clone(), event_tx, false)
            .await
            .unwrap();

        let (mut reader, _writer) = connect_client(&socket_path).await;
        assert!(matches!(
            next_server_message(&mut reader).await,
            ServerMessage::Hello { .. }
        ));

        server.stop(&sessions).await;
    }

    #[tokio::test]
    async fn test_second_daemon_refused_while_first_listening() {
        let mut harness = start_test_server().await;

        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let result =
            IpcServer::start(&harness.socket_path, SessionMap::new(), event_tx, false).await;

        match result {
            Err(message) => assert!(message.starts_with(ERR_SOCKET_IN_USE)),
            Ok(_) => panic!("second bind should have been refused"),
        }

        harness.server.stop(&harness.sessions).await;
    }

    #[tokio::test]
    async fn test_stop_removes_socket_file() {
        let mut harness = start_test_server().await;
        assert!(harness.socket_path.exists());

        harness.server.stop(&harness.sessions).await;

        assert!(!harness.socket_path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_socket_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let mut harness = start_test_server().await;

        let mode = std::fs::metadata(&harness.socket_path)
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);

        harness.server.stop(&harness.sessions).await;
    }
}
