use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use linkframe_transport::LinkStream;

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::framer::Framer;
use crate::reader::transport_to_frame_error;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes framed payloads to any `Write` channel.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    framer: Framer,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            framer: Framer::new(config.error_code),
            config,
        }
    }

    /// Frame a payload and write every resulting sub-frame (blocking).
    ///
    /// A write timeout surfaces as `FrameError::Io` with kind `WouldBlock`
    /// or `TimedOut`; part of the frame may already be on the wire.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        self.framer.encode_into(payload, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying channel.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner channel.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameWriter<LinkStream> {
    /// Create a frame writer for `LinkStream` and apply write timeout from config.
    pub fn with_config_link(inner: LinkStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::checksum::ErrorCode;
    use crate::deframer::decode_frame;
    use crate::framer::create_frame;

    #[test]
    fn write_matches_create_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"hello, link").unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, create_frame(b"hello, link", ErrorCode::Crc8).to_vec());
    }

    #[test]
    fn write_multiple_payloads() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"one").unwrap();
        writer.send(b"two").unwrap();

        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let first = decode_frame(&mut wire, ErrorCode::Crc8).unwrap().unwrap();
        let second = decode_frame(&mut wire, ErrorCode::Crc8).unwrap().unwrap();
        assert_eq!(first.as_ref(), b"one");
        assert_eq!(second.as_ref(), b"two");
        assert!(wire.is_empty());
    }

    #[test]
    fn empty_payload_still_writes_a_frame() {
        let cfg = FrameConfig::with_error_code(ErrorCode::Parity);
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);
        writer.send(b"").unwrap();
        assert_eq!(writer.into_inner().into_inner(), b"{\x00}");
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.send(b"x").unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_write() {
        let mut writer = FrameWriter::new(InterruptedOnce {
            interrupted: false,
            data: Vec::new(),
        });
        writer.send(b"retry").unwrap();
        assert_eq!(
            writer.get_ref().data,
            create_frame(b"retry", ErrorCode::Crc8).to_vec()
        );
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    #[cfg(unix)]
    fn link_writer_applies_timeout() {
        let (left, _right) = LinkStream::pair().unwrap();
        let cfg = FrameConfig {
            write_timeout: Some(std::time::Duration::from_millis(10)),
            ..FrameConfig::default()
        };
        let writer = FrameWriter::with_config_link(left, cfg).unwrap();
        assert!(writer.config().write_timeout.is_some());
    }

    #[test]
    #[cfg(unix)]
    fn write_timeout_fails_when_peer_stops_reading() {
        let (left, _right) = LinkStream::pair().unwrap();
        let cfg = FrameConfig {
            write_timeout: Some(std::time::Duration::from_millis(20)),
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config_link(left, cfg).unwrap();

        let started = std::time::Instant::now();
        let err = writer.send(&vec![0x55u8; 4 * 1024 * 1024]).unwrap_err();

        match err {
            FrameError::Io(io) => assert!(
                matches!(io.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut),
                "unexpected kind {:?}",
                io.kind()
            ),
            other => panic!("expected io timeout, got {other:?}"),
        }
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }

    #[test]
    fn would_block_is_returned_not_retried() {
        let mut writer = FrameWriter::new(WouldBlockWriter { calls: 0 });
        let err = writer.send(b"x").unwrap_err();
        assert!(matches!(err, FrameError::Io(ref io) if io.kind() == ErrorKind::WouldBlock));
        assert_eq!(writer.get_ref().calls, 1);
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedOnce {
        interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct WouldBlockWriter {
        calls: usize,
    }

    impl Write for WouldBlockWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
