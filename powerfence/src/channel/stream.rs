//! Session implementation over an async byte stream.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::buffer::PatternBuffer;
use super::patterns::PromptSet;
use super::session::{Expectation, Session};
use crate::error::ChannelError;

/// Read chunk size.
const READ_CHUNK: usize = 4096;

/// Interactive session over any tokio byte stream (a TCP socket, a pipe,
/// an in-memory duplex in tests).
pub struct StreamSession<S> {
    stream: S,

    /// Pattern buffer for accumulating output.
    buffer: PatternBuffer,

    /// Whether the channel is still usable.
    is_open: bool,
}

impl<S> StreamSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a connected stream.
    pub fn new(stream: S) -> Self {
        Self::with_buffer(stream, PatternBuffer::default())
    }

    /// Wrap a connected stream with a custom pattern buffer.
    pub fn with_buffer(stream: S, buffer: PatternBuffer) -> Self {
        Self {
            stream,
            buffer,
            is_open: true,
        }
    }

    /// Check if the channel is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Output received but not consumed by an expect yet.
    pub fn pending(&self) -> std::borrow::Cow<'_, str> {
        self.buffer.as_str_lossy()
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn mark_closed(&mut self, reason: &dyn std::fmt::Display) -> ChannelError {
        debug!("Channel closed: {}", reason);
        self.is_open = false;
        ChannelError::Closed
    }
}

#[async_trait]
impl<S> Session for StreamSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, text: &str) -> Result<(), ChannelError> {
        if !self.is_open {
            return Err(ChannelError::Closed);
        }
        if let Err(e) = self.stream.write_all(text.as_bytes()).await {
            return Err(self.mark_closed(&e));
        }
        if let Err(e) = self.stream.flush().await {
            return Err(self.mark_closed(&e));
        }
        Ok(())
    }

    async fn expect(
        &mut self,
        prompts: &PromptSet,
        timeout: Duration,
    ) -> Result<Expectation, ChannelError> {
        let start = tokio::time::Instant::now();
        let mut chunk = BytesMut::with_capacity(READ_CHUNK);
        // Leftover output from the previous expect is searched in full.
        let mut mark = 0;

        loop {
            if let Some(m) = self.buffer.search_since(prompts, mark) {
                let (before, matched) = self.buffer.split_at_match(&m);
                trace!("Matched prompt {:?} (alternative {})", matched, m.index);
                return Ok(Expectation {
                    before,
                    matched,
                    index: m.index,
                    elapsed: start.elapsed(),
                });
            }

            if !self.is_open {
                return Err(ChannelError::Closed);
            }

            mark = self.buffer.len();
            chunk.clear();
            // `timeout` saturates, so `Duration::MAX` waits indefinitely.
            let remaining = timeout.saturating_sub(start.elapsed());
            match tokio::time::timeout(remaining, self.stream.read_buf(&mut chunk)).await {
                Err(_) => {
                    trace!(
                        "No prompt within {:?}, pending: {:?}",
                        timeout,
                        self.buffer.as_str_lossy()
                    );
                    return Err(ChannelError::PatternTimeout(timeout));
                }
                Ok(Ok(0)) => return Err(self.mark_closed(&"end of stream")),
                Ok(Ok(n)) => {
                    trace!("Read {} bytes", n);
                    self.buffer.extend(&chunk);
                }
                Ok(Err(e)) => return Err(self.mark_closed(&e)),
            }
        }
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        if !self.is_open {
            return Ok(());
        }
        self.is_open = false;
        self.buffer.clear();
        // The peer may already be gone; nothing left to deliver either way.
        if let Err(e) = self.stream.shutdown().await {
            debug!("Shutdown failed: {}", e);
        }
        Ok(())
    }
}
