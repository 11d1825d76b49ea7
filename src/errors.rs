//! Error types for the Cinder wire protocol.
//!
//! Decode errors are structural: they describe why a buffer could not be
//! turned into a message. The parser collapses them into a per-variant
//! terminal [`ParseStatus`](crate::ParseStatus); nothing at this layer
//! panics on adversarial input.

use thiserror::Error;

/// Structural errors raised while decoding untrusted network bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer is shorter than the fixed message header
    #[error("header too short: expected {expected} bytes, got {actual}")]
    HeaderTooShort {
        /// Header size in bytes
        expected: usize,
        /// Actual size received
        actual: usize,
    },

    /// Stream ended before a field could be read in full
    #[error("unexpected end of stream: needed {expected} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the field requires
        expected: usize,
        /// Bytes left in the stream
        remaining: usize,
    },

    /// Header block-type bits do not name a block kind the operation accepts
    #[error("invalid block type: {0:#04x}")]
    InvalidBlockType(u8),

    /// Reserved byte of the bulk pull extended parameters must be zero
    #[error("reserved byte must be zero, got {0:#04x}")]
    ReservedByteNonZero(u8),

    /// Vote violates a structural invariant
    #[error("malformed vote: {0}")]
    MalformedVote(&'static str),
}

/// Convenient Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
