//! High-level error types

use oarlock_csafe::Response;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation attempted without an open session
    #[error("monitor not connected")]
    NotConnected,

    /// Structural codec failure while encoding or decoding a frame
    #[error("protocol error: {0}")]
    Csafe(#[from] oarlock_csafe::Error),

    /// A wire byte named no known vocabulary value
    #[error("vocabulary error: {0}")]
    Types(#[from] oarlock_types::Error),

    /// Transport failure outside the write/read fast path
    #[error("transport error: {0}")]
    Transport(#[from] oarlock_transport::Error),

    /// Request could not be delivered
    #[error("transport write failed: {0}")]
    TransportWrite(#[source] oarlock_transport::Error),

    /// Response packet could not be received
    #[error("transport read failed: {0}")]
    TransportRead(#[source] oarlock_transport::Error),

    /// No data arrived within the read window
    #[error("timed out waiting for response")]
    Timeout,

    /// Read returned bytes without a recoverable frame
    #[error("no recoverable frame in response packet")]
    MalformedResponse,

    /// Device accepted the frame but rejected the previous request;
    /// the parsed response is preserved for inspection
    #[error("device rejected the previous frame")]
    Rejected {
        response: Response,
    },

    /// The requested opcode is absent from the response or its data
    /// is shorter than the expected width
    #[error("invalid response: missing or short data for opcode 0x{0:02X}")]
    InvalidResponse(u8),
}
