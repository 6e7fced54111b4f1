//! Error types for oarlock-csafe

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Structural codec errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame or payload shorter than the protocol minimum
    #[error("frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Encoded frame exceeds the wire maximum
    #[error("encoded frame exceeds maximum length: {actual} bytes (max: {max} bytes)")]
    FrameTooLong {
        actual: usize,
        max: usize,
    },

    /// First byte is not a standard or extended start flag
    #[error("invalid frame start flag: 0x{0:02X}")]
    BadStartFlag(u8),

    /// Last byte is not the stop flag
    #[error("invalid frame stop flag: 0x{0:02X}")]
    BadStopFlag(u8),

    /// Escape byte followed by an invalid stuffing code, or nothing
    #[error("invalid byte stuffing sequence")]
    BadStuffing,

    /// Recomputed checksum does not match the received one
    #[error("checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    BadChecksum {
        expected: u8,
        received: u8,
    },

    /// Status byte carries a machine state outside the protocol table
    #[error("unknown machine state value: 0x{0:02X}")]
    UnknownState(u8),
}
