//! Frame reader for parsing newline-delimited messages from a stream

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::TERMINATOR;
use super::error::FrameError;
use super::limits::MAX_LINE_LENGTH;

/// Reads newline-delimited frames from an async buffered reader.
///
/// Partial lines are kept inside the reader between calls, so a
/// [`read_frame`](Self::read_frame) future can be dropped (for example by
/// losing a `select!` race) without corrupting the stream.
pub struct FrameReader<R> {
    reader: R,
    line: Vec<u8>,
    max_line: usize,
}

impl<R> FrameReader<R> {
    /// Create a new frame reader with the default line limit
    pub fn new(reader: R) -> Self {
        Self::with_max_line(reader, MAX_LINE_LENGTH)
    }

    /// Create a frame reader with a custom line limit (0 = unlimited)
    pub fn with_max_line(reader: R, max_line: usize) -> Self {
        Self {
            reader,
            line: Vec::new(),
            max_line,
        }
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume the frame reader and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    /// Read the next frame from the stream.
    ///
    /// Returns the bytes of one line with surrounding whitespace trimmed.
    /// Blank lines are skipped. Returns `Ok(None)` if the connection is
    /// cleanly closed at a line boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs, the peer disconnects in the
    /// middle of a line, or a line exceeds the configured maximum length.
    /// After `LineTooLong` the stream position is undefined and the
    /// connection should be dropped.
    pub async fn read_frame(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        loop {
            let (found_terminator, used) = {
                let available = self.reader.fill_buf().await?;
                if available.is_empty() {
                    // EOF: clean only if nothing but whitespace is pending
                    if self.line.iter().all(u8::is_ascii_whitespace) {
                        self.line.clear();
                        return Ok(None);
                    }
                    return Err(FrameError::ConnectionClosed);
                }
                match available.iter().position(|&b| b == TERMINATOR) {
                    Some(idx) => {
                        self.line.extend_from_slice(&available[..idx]);
                        (true, idx + 1)
                    }
                    None => {
                        self.line.extend_from_slice(available);
                        (false, available.len())
                    }
                }
            };
            self.reader.consume(used);

            if self.max_line > 0 && self.line.len() > self.max_line {
                let length = self.line.len();
                self.line.clear();
                return Err(FrameError::LineTooLong {
                    length,
                    max: self.max_line,
                });
            }

            if found_terminator {
                let frame = std::mem::take(&mut self.line);
                let trimmed = frame.trim_ascii();
                if trimmed.is_empty() {
                    continue;
                }
                return Ok(Some(trimmed.to_vec()));
            }
        }
    }
}
