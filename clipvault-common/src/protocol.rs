//! IPC protocol message types
//!
//! Every message crosses the socket as one line of JSON tagged by `type`.
//! The daemon sends [`ServerMessage`]s; clients send [`ClientMessage`]s.
//! Serde ignores unknown fields, so newer clients can add fields without
//! breaking older daemons.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigPatch, VaultConfig};

/// Messages sent from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// A command for the daemon to execute
    Command {
        action: CommandAction,
        /// Entry id, required by `delete_entry` and `copy_entry`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        /// Partial configuration, required by `update_config`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<ConfigPatch>,
    },
}

/// Actions a client can request via a `command` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    ClearClipboard,
    PauseCountdown,
    ResumeCountdown,
    DeleteEntry,
    CopyEntry,
    ClearHistory,
    GetConfig,
    UpdateConfig,
    Quit,
}

/// Messages sent from the daemon to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Sent once, immediately after a client connects
    Hello { version: String },
    /// Full daemon state, broadcast to every client on any observable change
    #[serde(rename_all = "camelCase")]
    State {
        /// Remaining seconds before the clipboard is wiped, None while idle
        countdown: Option<u64>,
        /// Whether an active countdown is currently paused
        paused: bool,
        /// Most recently accessed entries, newest first
        history: Vec<HistoryItem>,
        /// Total rows in the store, independent of the display window
        entry_count: i64,
    },
    /// Direct reply to a `get_config` command
    Config { config: VaultConfig },
    /// Protocol-level failure report
    Error { message: String },
}

/// One decrypted history entry as presented to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: i64,
    /// Leading characters of the plaintext, newlines normalized to spaces
    pub preview: String,
    /// Full stored plaintext length; the preview may be shorter
    pub content_length: i64,
    pub created_at: String,
    pub accessed_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> HistoryItem {
        HistoryItem {
            id: 7,
            preview: "hello world".to_string(),
            content_length: 11,
            created_at: "2025-01-01 10:00:00".to_string(),
            accessed_at: "2025-01-01 10:05:00".to_string(),
        }
    }

    #[test]
    fn test_command_wire_format() {
        let msg = ClientMessage::Command {
            action: CommandAction::ClearClipboard,
            id: None,
            config: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"command","action":"clear_clipboard"}"#);
    }

    #[test]
    fn test_command_with_id_round_trip() {
        let msg = ClientMessage::Command {
            action: CommandAction::CopyEntry,
            id: Some(42),
            config: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"command","action":"copy_entry","id":42}"#);

        let parsed: ClientMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_command_all_action_names() {
        // Wire action names are snake_case strings
        let cases = [
            (CommandAction::ClearClipboard, "clear_clipboard"),
            (CommandAction::PauseCountdown, "pause_countdown"),
            (CommandAction::ResumeCountdown, "resume_countdown"),
            (CommandAction::DeleteEntry, "delete_entry"),
            (CommandAction::CopyEntry, "copy_entry"),
            (CommandAction::ClearHistory, "clear_history"),
            (CommandAction::GetConfig, "get_config"),
            (CommandAction::UpdateConfig, "update_config"),
            (CommandAction::Quit, "quit"),
        ];
        for (action, name) in cases {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{name}\""));
        }
    }

    #[test]
    fn test_command_with_config_patch() {
        let json = r#"{"type":"command","action":"update_config","config":{"wipeDelay":30}}"#;
        let parsed: ClientMessage = serde_json::from_str(json).unwrap();
        match parsed {
            ClientMessage::Command {
                action,
                id,
                config: Some(patch),
            } => {
                assert_eq!(action, CommandAction::UpdateConfig);
                assert_eq!(id, None);
                assert_eq!(patch.wipe_delay, Some(30));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let json = r#"{"type":"command","action":"explode"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_unknown_extra_fields_tolerated() {
        let json = r#"{"type":"command","action":"quit","sentFrom":"menubar"}"#;
        let parsed: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            ClientMessage::Command {
                action: CommandAction::Quit,
                id: None,
                config: None,
            }
        );
    }

    #[test]
    fn test_hello_wire_format() {
        let msg = ServerMessage::Hello {
            version: crate::PROTOCOL_VERSION.to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"hello","version":"0.1.0"}"#);
    }

    #[test]
    fn test_state_wire_format_idle() {
        // Idle state serializes countdown as an explicit null
        let msg = ServerMessage::State {
            countdown: None,
            paused: false,
            history: vec![],
            entry_count: 0,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"state","countdown":null,"paused":false,"history":[],"entryCount":0}"#
        );
    }

    #[test]
    fn test_state_history_item_camel_case() {
        let msg = ServerMessage::State {
            countdown: Some(5),
            paused: true,
            history: vec![sample_item()],
            entry_count: 12,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"countdown\":5"));
        assert!(json.contains("\"paused\":true"));
        assert!(json.contains("\"contentLength\":11"));
        assert!(json.contains("\"createdAt\":"));
        assert!(json.contains("\"accessedAt\":"));
        assert!(json.contains("\"entryCount\":12"));
    }

    #[test]
    fn test_state_round_trip() {
        let msg = ServerMessage::State {
            countdown: Some(3),
            paused: false,
            history: vec![sample_item()],
            entry_count: 1,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ServerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_config_frame_round_trip() {
        let msg = ServerMessage::Config {
            config: crate::config::VaultConfig::default(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.starts_with(r#"{"type":"config","config":{"#));

        let parsed: ServerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_error_wire_format() {
        let msg = ServerMessage::Error {
            message: "decryption failed".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"error","message":"decryption failed"}"#);
    }

    #[test]
    fn test_server_message_unknown_type_rejected() {
        let json = r#"{"type":"goodbye"}"#;
        assert!(serde_json::from_str::<ServerMessage>(json).is_err());
    }
}
