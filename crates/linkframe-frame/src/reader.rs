use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use linkframe_transport::LinkStream;

use crate::config::FrameConfig;
use crate::deframer::{Deframe, Deframer};
use crate::error::{FrameError, Result};
use crate::stats::LinkStats;

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// Reads verified sub-frame payloads from any `Read` channel.
///
/// Owns the receive buffer. Corrupt frames are counted and skipped; callers
/// only ever see payloads whose checksum matched.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    deframer: Deframer,
    config: FrameConfig,
    stats: LinkStats,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            deframer: Deframer::new(config.error_code),
            config,
            stats: LinkStats::default(),
        }
    }

    /// Read the next verified payload (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(payload) = self.next_buffered() {
                return Ok(payload);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Extract the next payload already sitting in the receive buffer.
    fn next_buffered(&mut self) -> Option<Bytes> {
        loop {
            let outcome = self.deframer.process_frame(&mut self.buf);
            self.stats.record(&outcome);
            match outcome {
                Deframe::Done(payload) => return Some(payload),
                Deframe::Incomplete => return None,
                Deframe::Corrupt(_) => continue,
            }
        }
    }

    /// Bytes received but not yet consumed by a frame.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner channel.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<LinkStream> {
    /// Create a frame reader for `LinkStream` and apply read timeout from config.
    pub fn with_config_link(inner: LinkStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

pub(crate) fn transport_to_frame_error(err: linkframe_transport::TransportError) -> FrameError {
    match err {
        linkframe_transport::TransportError::Io(io)
        | linkframe_transport::TransportError::Accept(io) => FrameError::Io(io),
        linkframe_transport::TransportError::Bind { source, .. }
        | linkframe_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
