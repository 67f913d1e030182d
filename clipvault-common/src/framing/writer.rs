//! Frame writer for sending newline-delimited messages to a stream

use tokio::io::AsyncWriteExt;

use super::TERMINATOR;
use super::error::FrameError;

/// Writes newline-delimited frames to an async writer
pub struct FrameWriter<W> {
    writer: W,
}

impl<W> FrameWriter<W> {
    /// Create a new frame writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Get a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the frame writer and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: AsyncWriteExt + Unpin> FrameWriter<W> {
    /// Write one frame payload followed by the terminator, then flush.
    ///
    /// The payload must not contain the terminator byte; serialized JSON
    /// never does.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    pub async fn write_frame(&mut self, payload: &[u8]) -> Result<(), FrameError> {
        self.writer.write_all(payload).await?;
        self.writer.write_all(&[TERMINATOR]).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
