use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::ErrorCode;
use crate::escape::{escape_into, START, STOP};

/// Maximum number of payload bytes covered by one checksum.
pub const SUB_FRAME_SIZE: usize = 8;

/// Width of the checksum trailer, before escaping.
pub const CHECKSUM_SIZE: usize = 1;

/// Number of frames a payload of `len` bytes is split into.
///
/// An empty payload still produces one (empty) frame.
pub fn sub_frame_count(len: usize) -> usize {
    len.div_ceil(SUB_FRAME_SIZE).max(1)
}

/// Encode a payload into one or more frames.
///
/// Wire format, repeated once per sub-frame:
/// ```text
/// ┌───────┬──────────────────────────┬────────────────┬──────┐
/// │ START │ escaped data (0..=8 B)   │ escaped check  │ STOP │
/// │  '{'  │                          │ (1 B literal)  │ '}'  │
/// └───────┴──────────────────────────┴────────────────┴──────┘
/// ```
/// The checksum covers the literal data bytes, never their escaped form.
pub fn encode_frame(payload: &[u8], code: ErrorCode, dst: &mut BytesMut) {
    // worst case every byte, plus the checksum, is escaped
    dst.reserve(2 * payload.len() + sub_frame_count(payload.len()) * (2 + 2 * CHECKSUM_SIZE));

    if payload.is_empty() {
        encode_sub_frame(&[], code, dst);
        return;
    }
    for sub_frame in payload.chunks(SUB_FRAME_SIZE) {
        encode_sub_frame(sub_frame, code, dst);
    }
}

/// Encode a payload into a fresh buffer.
pub fn create_frame(payload: &[u8], code: ErrorCode) -> Bytes {
    let mut dst = BytesMut::new();
    encode_frame(payload, code, &mut dst);
    dst.freeze()
}

fn encode_sub_frame(sub_frame: &[u8], code: ErrorCode, dst: &mut BytesMut) {
    debug_assert!(sub_frame.len() <= SUB_FRAME_SIZE);

    dst.put_u8(START);
    for &byte in sub_frame {
        escape_into(byte, dst);
    }
    escape_into(code.compute(sub_frame), dst);
    dst.put_u8(STOP);
}

/// Sending half of a link with a fixed error-detection code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Framer {
    code: ErrorCode,
}

impl Framer {
    pub fn new(code: ErrorCode) -> Self {
        Self { code }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.code
    }

    pub fn create_frame(&self, payload: &[u8]) -> Bytes {
        create_frame(payload, self.code)
    }

    pub fn encode_into(&self, payload: &[u8], dst: &mut BytesMut) {
        encode_frame(payload, self.code, dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::crc8;
    use crate::escape::ESCAPE;

    #[test]
    fn empty_payload_yields_one_frame() {
        let wire = create_frame(b"", ErrorCode::Crc8);
        assert_eq!(wire.as_ref(), &[START, 0x00, STOP]);

        let wire = create_frame(b"", ErrorCode::Parity);
        assert_eq!(wire.as_ref(), &[START, 0x00, STOP]);
    }

    #[test]
    fn short_payload_single_frame() {
        let wire = create_frame(b"hello", ErrorCode::Parity);
        assert_eq!(wire.as_ref(), b"{hello\x01}");
    }

    #[test]
    fn exactly_eight_bytes_is_one_frame() {
        let wire = create_frame(b"abcdefgh", ErrorCode::Crc8);
        let mut expected = b"{abcdefgh".to_vec();
        expected.push(0xA8);
        expected.push(STOP);
        assert_eq!(wire.as_ref(), expected.as_slice());
    }

    #[test]
    fn nine_bytes_split_into_two_frames() {
        let wire = create_frame(b"abcdefghi", ErrorCode::Crc8);
        let mut expected = b"{abcdefgh".to_vec();
        expected.extend_from_slice(&[0xA8, STOP, START, b'i', b'i', STOP]);
        assert_eq!(wire.as_ref(), expected.as_slice());
        assert_eq!(sub_frame_count(9), 2);
    }

    #[test]
    fn reserved_data_bytes_are_escaped() {
        let wire = create_frame(b"a{b", ErrorCode::Parity);
        let sum = ErrorCode::Parity.compute(b"a{b");
        assert_eq!(wire.as_ref(), &[START, b'a', ESCAPE, START, b'b', sum, STOP]);
    }

    #[test]
    fn checksum_equal_to_delimiter_is_escaped() {
        // "eo" has a CRC remainder equal to the stop delimiter
        assert_eq!(crc8(b"eo"), STOP);
        let wire = create_frame(b"eo", ErrorCode::Crc8);
        assert_eq!(wire.as_ref(), &[START, b'e', b'o', ESCAPE, STOP, STOP]);

        assert_eq!(crc8(b"mg"), ESCAPE);
        let wire = create_frame(b"mg", ErrorCode::Crc8);
        assert_eq!(wire.as_ref(), &[START, b'm', b'g', ESCAPE, ESCAPE, STOP]);
    }

    #[test]
    fn checksum_uses_literal_bytes() {
        let payload = [START, STOP, ESCAPE];
        let wire = create_frame(&payload, ErrorCode::Crc8);
        let sum = crc8(&payload);
        assert!(!crate::escape::needs_escape(sum));
        assert_eq!(wire[wire.len() - 2], sum);
    }

    #[test]
    fn sub_frame_counts() {
        assert_eq!(sub_frame_count(0), 1);
        assert_eq!(sub_frame_count(1), 1);
        assert_eq!(sub_frame_count(8), 1);
        assert_eq!(sub_frame_count(16), 2);
        assert_eq!(sub_frame_count(17), 3);
    }

    #[test]
    fn framer_uses_configured_code() {
        let framer = Framer::new(ErrorCode::Parity);
        assert_eq!(framer.error_code(), ErrorCode::Parity);
        assert_eq!(framer.create_frame(b"hello").as_ref(), b"{hello\x01}");

        let mut dst = BytesMut::new();
        framer.encode_into(b"ab", &mut dst);
        framer.encode_into(b"cd", &mut dst);
        assert_eq!(dst.iter().filter(|&&b| b == START).count(), 2);
    }
}
