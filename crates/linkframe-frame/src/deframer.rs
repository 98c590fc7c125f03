use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::checksum::ErrorCode;
use crate::error::{Corruption, FrameError, Result};
use crate::escape::{unescape, Token, START};
use crate::framer::{CHECKSUM_SIZE, SUB_FRAME_SIZE};

const MAX_LITERAL_BYTES: usize = SUB_FRAME_SIZE + CHECKSUM_SIZE;

/// Outcome of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deframe {
    /// A verified sub-frame payload.
    Done(Bytes),
    /// Not enough bytes buffered yet. Call again after the next append.
    Incomplete,
    /// A frame was dropped. The buffer has moved past it.
    Corrupt(Corruption),
}

impl Deframe {
    pub fn is_done(&self) -> bool {
        matches!(self, Deframe::Done(_))
    }

    /// The payload, if this attempt produced one.
    pub fn into_payload(self) -> Option<Bytes> {
        match self {
            Deframe::Done(payload) => Some(payload),
            Deframe::Incomplete | Deframe::Corrupt(_) => None,
        }
    }
}

/// Receiving half of a link.
///
/// Holds no buffer of its own: every call scans the caller's receive buffer
/// from the front and either removes one frame (plus any garbage before it)
/// or leaves the pending bytes in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deframer {
    code: ErrorCode,
}

impl Deframer {
    pub fn new(code: ErrorCode) -> Self {
        Self { code }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.code
    }

    /// Try to extract one sub-frame from the front of `buf`.
    pub fn process_frame(&self, buf: &mut BytesMut) -> Deframe {
        match buf.iter().position(|&byte| byte == START) {
            Some(0) => {}
            Some(garbage) => {
                debug!(garbage, "discarding bytes before start delimiter");
                buf.advance(garbage);
            }
            None => {
                if !buf.is_empty() {
                    debug!(garbage = buf.len(), "no start delimiter buffered");
                }
                buf.clear();
                return Deframe::Incomplete;
            }
        }

        // buf[0] is the start delimiter of the frame being assembled.
        let mut literal = [0u8; MAX_LITERAL_BYTES];
        let mut len = 0usize;
        let mut pos = 1usize;

        loop {
            let Some((token, width)) = unescape(&buf[pos..]) else {
                return Deframe::Incomplete;
            };
            pos += width;

            match token {
                Token::Literal(byte) => {
                    if len == MAX_LITERAL_BYTES {
                        buf.advance(pos);
                        return self.reject(Corruption::OversizedSubFrame { len: len + 1 }, buf);
                    }
                    literal[len] = byte;
                    len += 1;
                }
                Token::Start => {
                    // The open frame never saw its stop delimiter. Drop it and
                    // leave the new start delimiter at the front.
                    buf.advance(pos - 1);
                    return self.reject(Corruption::Malformed, buf);
                }
                Token::Stop => {
                    buf.advance(pos);
                    return self.finish(&literal[..len], buf);
                }
            }
        }
    }

    fn finish(&self, literal: &[u8], buf: &BytesMut) -> Deframe {
        let Some((&received, data)) = literal.split_last() else {
            return self.reject(Corruption::Malformed, buf);
        };

        let expected = self.code.compute(data);
        if expected != received {
            return self.reject(Corruption::ChecksumMismatch { expected, received }, buf);
        }

        debug!(len = data.len(), code = %self.code, "frame extracted");
        Deframe::Done(Bytes::copy_from_slice(data))
    }

    fn reject(&self, reason: Corruption, buf: &BytesMut) -> Deframe {
        warn!(%reason, code = %self.code, buffered = buf.len(), "dropping frame");
        Deframe::Corrupt(reason)
    }
}

/// Decode one sub-frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet and
/// `Err(FrameError::Corrupt)` when a frame was dropped; in both cases the
/// buffer is left ready for the next call.
pub fn decode_frame(src: &mut BytesMut, code: ErrorCode) -> Result<Option<Bytes>> {
    match Deframer::new(code).process_frame(src) {
        Deframe::Done(payload) => Ok(Some(payload)),
        Deframe::Incomplete => Ok(None),
        Deframe::Corrupt(reason) => Err(FrameError::Corrupt(reason)),
    }
}
