//! Data-link framing over unreliable byte channels.
//!
//! linkframe turns arbitrary payloads into self-delimiting, byte-stuffed
//! frames with a one-byte checksum per 8-byte sub-frame, and turns a stream
//! of possibly damaged bytes back into verified payloads.
//!
//! # Crate Structure
//!
//! - [`transport`] - Byte channels (UDS, loopback pair, injected noise)
//! - [`frame`] - Escaping, parity/CRC-8, framer and streaming deframer

/// Re-export transport types.
pub mod transport {
    pub use linkframe_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use linkframe_frame::*;
}
