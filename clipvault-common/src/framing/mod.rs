//! Newline-delimited JSON framing for the IPC protocol
//!
//! Wire format: one JSON object per line, terminated by `\n`. There is no
//! header or length prefix; the terminator is the frame boundary. Blank
//! lines are tolerated between frames and skipped on read.

mod error;
pub mod limits;
mod reader;
mod writer;

pub use error::FrameError;
pub use reader::FrameReader;
pub use writer::FrameWriter;

/// Frame terminator byte
pub const TERMINATOR: u8 = b'\n';
