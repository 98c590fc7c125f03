//! Per-sub-frame error detection.
//!
//! Both codes produce exactly one byte and are computed over the literal
//! (unescaped) sub-frame bytes. The checksum byte itself is never fed back in.

use std::fmt;
use std::str::FromStr;

/// CRC-8 generator polynomial x^8 + x^7 + x^6 + x^4 + x^2 + 1.
pub const CRC8_GENERATOR: u16 = 0x1D5;

const CARRY_BIT: u16 = 0x100;

/// Error-detection code used on a link. Both ends must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// Even parity over every bit of the sub-frame.
    Parity,
    /// Bit-serial CRC-8 with [`CRC8_GENERATOR`].
    #[default]
    Crc8,
}

impl ErrorCode {
    /// Compute the checksum byte for a sub-frame.
    pub fn compute(self, sub_frame: &[u8]) -> u8 {
        match self {
            ErrorCode::Parity => parity(sub_frame),
            ErrorCode::Crc8 => crc8(sub_frame),
        }
    }

    /// Recompute over `sub_frame` and compare with the received checksum byte.
    pub fn verify(self, sub_frame: &[u8], received: u8) -> bool {
        self.compute(sub_frame) == received
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Parity => "parity",
            ErrorCode::Crc8 => "crc8",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown error-code name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code {0:?} (expected \"parity\" or \"crc8\")")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parity" => Ok(ErrorCode::Parity),
            "crc8" | "crc" | "crc-8" => Ok(ErrorCode::Crc8),
            _ => Err(UnknownErrorCode(s.to_string())),
        }
    }
}

/// Total number of set bits across `data`, mod 2.
pub fn parity(data: &[u8]) -> u8 {
    let ones: u32 = data.iter().map(|byte| byte.count_ones()).sum();
    (ones % 2) as u8
}

/// CRC-8 remainder of `data`, most significant bit of each byte first.
pub fn crc8(data: &[u8]) -> u8 {
    let mut lfsr = Lfsr::new();
    for &byte in data {
        lfsr.push_byte(byte);
    }
    lfsr.remainder()
}

/// Shift register for bit-serial division by [`CRC8_GENERATOR`].
///
/// Holds at most 9 bits between steps; bit 8 is cleared by the conditional
/// XOR before the next bit arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lfsr {
    state: u16,
}

impl Lfsr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.state = (self.state << 1) | u16::from(bit);
        if self.state & CARRY_BIT != 0 {
            self.state ^= CRC8_GENERATOR;
        }
    }

    pub fn push_byte(&mut self, byte: u8) {
        for shift in (0..8).rev() {
            self.push_bit((byte >> shift) & 1 == 1);
        }
    }

    pub fn remainder(&self) -> u8 {
        (self.state & 0xFF) as u8
    }
}
