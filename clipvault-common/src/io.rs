//! I/O utilities for sending and receiving protocol messages
//!
//! This module is the seam between the protocol message types and the wire
//! framing. Reads skip lines that fail to parse as JSON, matching the rule
//! that a malformed frame must never kill a connection.

use std::io;

use tokio::io::{AsyncBufRead, AsyncWriteExt};

use crate::framing::{FrameError, FrameReader, FrameWriter};
use crate::protocol::{ClientMessage, ServerMessage};

// =============================================================================
// Error Conversion
// =============================================================================

impl From<FrameError> for io::Error {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(msg) => io::Error::other(msg),
            FrameError::ConnectionClosed => {
                io::Error::new(io::ErrorKind::ConnectionReset, "connection closed")
            }
            other => io::Error::other(other.to_string()),
        }
    }
}

// =============================================================================
// Message Sending
// =============================================================================

/// Send a `ClientMessage` to the daemon
pub async fn send_client_message<W>(
    writer: &mut FrameWriter<W>,
    message: &ClientMessage,
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    let payload =
        serde_json::to_vec(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer.write_frame(&payload).await.map_err(Into::into)
}

/// Send a `ServerMessage` to a client
pub async fn send_server_message<W>(
    writer: &mut FrameWriter<W>,
    message: &ServerMessage,
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    let payload =
        serde_json::to_vec(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer.write_frame(&payload).await.map_err(Into::into)
}

// =============================================================================
// Message Receiving
// =============================================================================

/// Read the next `ClientMessage` from the stream.
///
/// Lines that are not valid JSON for a known message are skipped silently.
/// Returns `Ok(None)` if the connection was cleanly closed.
pub async fn read_client_message<R>(
    reader: &mut FrameReader<R>,
) -> io::Result<Option<ClientMessage>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let Some(frame) = reader.read_frame().await? else {
            return Ok(None);
        };
        if let Ok(message) = serde_json::from_slice(&frame) {
            return Ok(Some(message));
        }
        // Malformed line: drop it, keep the connection
    }
}

/// Read the next `ServerMessage` from the stream.
///
/// Lines that are not valid JSON for a known message are skipped silently.
/// Returns `Ok(None)` if the connection was cleanly closed.
pub async fn read_server_message<R>(
    reader: &mut FrameReader<R>,
) -> io::Result<Option<ServerMessage>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let Some(frame) = reader.read_frame().await? else {
            return Ok(None);
        };
        if let Ok(message) = serde_json::from_slice(&frame) {
            return Ok(Some(message));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
