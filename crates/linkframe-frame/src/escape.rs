//! Byte-stuffing for the three reserved wire bytes.
//!
//! Any payload or checksum byte equal to [`START`], [`STOP`] or [`ESCAPE`] is
//! sent as `ESCAPE, byte`. On the receive side an escape byte always takes the
//! following byte literally, whatever its value.

use bytes::{BufMut, BytesMut};

/// Opens a frame.
pub const START: u8 = b'{';

/// Closes a frame.
pub const STOP: u8 = b'}';

/// Marks the next byte as literal data.
pub const ESCAPE: u8 = b'\\';

/// Returns true if `byte` must be escaped before it reaches the wire.
pub fn needs_escape(byte: u8) -> bool {
    matches!(byte, START | STOP | ESCAPE)
}

/// The wire form of a single byte: one byte, or escape + byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escaped {
    bytes: [u8; 2],
    len: usize,
}

impl Escaped {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for Escaped {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Escape a single byte.
pub fn escape(byte: u8) -> Escaped {
    if needs_escape(byte) {
        Escaped {
            bytes: [ESCAPE, byte],
            len: 2,
        }
    } else {
        Escaped {
            bytes: [byte, 0],
            len: 1,
        }
    }
}

/// Escape a single byte directly into `dst`.
pub fn escape_into(byte: u8, dst: &mut BytesMut) {
    if needs_escape(byte) {
        dst.put_u8(ESCAPE);
    }
    dst.put_u8(byte);
}

/// One logical unit read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A data byte, either plain or taken from behind an escape.
    Literal(u8),
    /// An unescaped start delimiter.
    Start,
    /// An unescaped stop delimiter.
    Stop,
}

/// Read the next logical unit from the front of `src`.
///
/// Returns the token and the number of wire bytes it occupied, or `None` when
/// `src` is empty or ends in a lone escape byte. `None` means "wait for more
/// bytes", never an error.
pub fn unescape(src: &[u8]) -> Option<(Token, usize)> {
    match src.first()? {
        &ESCAPE => src.get(1).map(|&byte| (Token::Literal(byte), 2)),
        &START => Some((Token::Start, 1)),
        &STOP => Some((Token::Stop, 1)),
        &byte => Some((Token::Literal(byte), 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bytes_are_distinct() {
        assert_ne!(START, STOP);
        assert_ne!(START, ESCAPE);
        assert_ne!(STOP, ESCAPE);
    }

    #[test]
    fn plain_byte_passes_through() {
        assert_eq!(escape(b'a').as_slice(), b"a");
        assert!(!needs_escape(0x00));
        assert!(!needs_escape(0xFF));
    }

    #[test]
    fn reserved_bytes_get_prefixed() {
        assert_eq!(escape(START).as_slice(), &[ESCAPE, START]);
        assert_eq!(escape(STOP).as_slice(), &[ESCAPE, STOP]);
        assert_eq!(escape(ESCAPE).as_slice(), &[ESCAPE, ESCAPE]);
    }

    #[test]
    fn unescape_inverts_escape_for_every_byte() {
        for byte in 0..=u8::MAX {
            let wire = escape(byte);
            assert_eq!(
                unescape(wire.as_slice()),
                Some((Token::Literal(byte), wire.len())),
                "byte 0x{byte:02x}"
            );
        }
    }

    #[test]
    fn escape_into_matches_escape() {
        let mut dst = BytesMut::new();
        for byte in [b'x', START, STOP, ESCAPE] {
            escape_into(byte, &mut dst);
        }
        assert_eq!(
            dst.as_ref(),
            &[b'x', ESCAPE, START, ESCAPE, STOP, ESCAPE, ESCAPE]
        );
    }

    #[test]
    fn escaped_delimiter_is_literal() {
        assert_eq!(unescape(&[ESCAPE, STOP, STOP]), Some((Token::Literal(STOP), 2)));
        assert_eq!(unescape(&[ESCAPE, START]), Some((Token::Literal(START), 2)));
    }

    #[test]
    fn bare_delimiters_are_tokens() {
        assert_eq!(unescape(&[START, b'a']), Some((Token::Start, 1)));
        assert_eq!(unescape(&[STOP]), Some((Token::Stop, 1)));
    }

    #[test]
    fn trailing_escape_is_incomplete() {
        assert_eq!(unescape(&[ESCAPE]), None);
        assert_eq!(unescape(&[]), None);
    }
}
