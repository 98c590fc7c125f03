/// Why a frame was dropped by the deframer.
///
/// Every variant means one frame is lost; the receive buffer is already past
/// the damaged bytes and can be scanned again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Corruption {
    /// A delimiter arrived where data was expected: a stop with no checksum
    /// byte in front of it, or a start inside an open frame.
    #[error("malformed frame (unexpected delimiter)")]
    Malformed,

    /// The frame was well formed but its checksum disagrees with the data.
    #[error("checksum mismatch (computed 0x{expected:02x}, received 0x{received:02x})")]
    ChecksumMismatch { expected: u8, received: u8 },

    /// More literal bytes than a sub-frame plus checksum can hold.
    #[error("oversized sub-frame ({len} literal bytes before stop delimiter)")]
    OversizedSubFrame { len: usize },
}

/// Errors that can occur while moving frames over a channel.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A frame was rejected.
    #[error("corrupt frame: {0}")]
    Corrupt(#[from] Corruption),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was closed before another complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
