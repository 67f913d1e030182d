//! Connected client session registry

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tokio::sync::{RwLock, mpsc};

use clipvault_common::protocol::ServerMessage;

/// A connected client's outbound message queue
#[derive(Clone)]
pub struct Session {
    pub id: u32,
    pub tx: mpsc::UnboundedSender<ServerMessage>,
}

/// Registry of connected clients
///
/// Cheap to clone; the accept loop, connection tasks, and the daemon all
/// share the same map.
#[derive(Clone, Default)]
pub struct SessionMap {
    sessions: Arc<RwLock<HashMap<u32, Session>>>,
    next_id: Arc<AtomicU32>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session, returning its allocated id
    pub async fn register(&self, tx: mpsc::UnboundedSender<ServerMessage>) -> u32 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let session = Session { id, tx };
        self.sessions.write().await.insert(id, session);
        id
    }

    /// Remove a session; no-op when already gone
    pub async fn unregister(&self, id: u32) {
        self.sessions.write().await.remove(&id);
    }

    /// Queue a message for every connected session
    ///
    /// A full or closed queue means that client is on its way out; its
    /// connection task cleans up, so failures here are ignored.
    pub async fn broadcast(&self, message: &ServerMessage) {
        let sessions = self.sessions.read().await;
        for session in sessions.values() {
            let _ = session.tx.send(message.clone());
        }
    }

    /// Queue a message for one session
    ///
    /// Returns false if the session is gone or its queue is closed.
    pub async fn send_to(&self, id: u32, message: ServerMessage) -> bool {
        let sessions = self.sessions.read().await;
        match sessions.get(&id) {
            Some(session) => session.tx.send(message).is_ok(),
            None => false,
        }
    }

    /// Number of connected sessions
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}
