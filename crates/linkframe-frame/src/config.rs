use std::time::Duration;

use crate::checksum::ErrorCode;

/// Configuration for a framed link endpoint.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Error-detection code. Must match the other end. Default: CRC-8.
    pub error_code: ErrorCode,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<Duration>,
}

impl FrameConfig {
    pub fn with_error_code(error_code: ErrorCode) -> Self {
        Self {
            error_code,
            ..Self::default()
        }
    }
}
