//! Framing error types

use std::fmt;
use std::io;

/// Errors that can occur while reading or writing frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Underlying I/O failure
    Io(String),
    /// The peer closed the connection in the middle of a line
    ConnectionClosed,
    /// A line grew past the maximum accepted frame length
    LineTooLong {
        /// Bytes accumulated before giving up
        length: usize,
        /// The limit that was exceeded
        max: usize,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Io(msg) => write!(f, "I/O error: {msg}"),
            FrameError::ConnectionClosed => write!(f, "connection closed mid-frame"),
            FrameError::LineTooLong { length, max } => {
                write!(f, "frame of {length} bytes exceeds limit of {max}")
            }
        }
    }
}

impl std::error::Error for FrameError {}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => FrameError::ConnectionClosed,
            _ => FrameError::Io(err.to_string()),
        }
    }
}
