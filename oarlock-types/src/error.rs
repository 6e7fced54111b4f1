//! Error types for oarlock-types

/// Result type alias for vocabulary conversions
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion errors for wire discriminants
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wire byte does not name a known value of the target enum
    #[error("unknown {kind} value: 0x{value:02X}")]
    UnknownValue {
        kind: &'static str,
        value: u8,
    },
}

impl Error {
    pub(crate) fn unknown(kind: &'static str, value: u8) -> Self {
        Self::UnknownValue { kind, value }
    }
}
