//! Byte-stuffed, checksummed framing for unreliable byte channels.
//!
//! A payload is cut into sub-frames of at most 8 bytes. Each sub-frame goes
//! on the wire as:
//! - a start delimiter `{`
//! - the escaped data bytes
//! - one escaped checksum byte (even parity or CRC-8, see [`ErrorCode`])
//! - a stop delimiter `}`
//!
//! The receive side scans a caller-owned [`bytes::BytesMut`] and extracts one
//! verified sub-frame per [`Deframer::process_frame`] call, dropping damaged
//! frames and resynchronising on the next start delimiter.

pub mod checksum;
#[cfg(feature = "async")]
pub mod codec;
pub mod config;
pub mod deframer;
pub mod error;
pub mod escape;
pub mod framer;
pub mod reader;
pub mod stats;
pub mod writer;

pub use checksum::{crc8, parity, ErrorCode, Lfsr, UnknownErrorCode, CRC8_GENERATOR};
#[cfg(feature = "async")]
pub use codec::LinkCodec;
pub use config::FrameConfig;
pub use deframer::{decode_frame, Deframe, Deframer};
pub use error::{Corruption, FrameError, Result};
pub use escape::{ESCAPE, START, STOP};
pub use framer::{create_frame, encode_frame, sub_frame_count, Framer, CHECKSUM_SIZE, SUB_FRAME_SIZE};
pub use reader::FrameReader;
pub use stats::LinkStats;
pub use writer::FrameWriter;
