//! Per-message-type views of the header extensions field.
//!
//! The 16-bit extensions field is a single storage whose bits mean
//! different things depending on the header's own message type. Bits
//! 8-11 always hold the block-type tag (see
//! [`MessageHeader::block_type`](crate::MessageHeader::block_type));
//! the views here cover the bits a specific message type reinterprets.
//! There are deliberately no protocol-wide flag names.

use bitflags::bitflags;

bitflags! {
    /// Extension bits as seen by a `bulk_pull` message
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BulkPullFlags: u16 {
        /// Extended count parameters follow the start/end pair
        const COUNT_PRESENT = 1 << 0;
    }
}

bitflags! {
    /// Extension bits as seen by a `node_id_handshake` message
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HandshakeFlags: u16 {
        /// A 32-byte query cookie is present
        const QUERY = 1 << 0;

        /// An account/signature response pair is present
        const RESPONSE = 1 << 1;
    }
}

impl BulkPullFlags {
    /// View raw extension bits; unknown bits are preserved but ignored.
    #[must_use]
    pub const fn from_extensions(extensions: u16) -> Self {
        Self::from_bits_retain(extensions)
    }
}

impl HandshakeFlags {
    /// View raw extension bits; unknown bits are preserved but ignored.
    #[must_use]
    pub const fn from_extensions(extensions: u16) -> Self {
        Self::from_bits_retain(extensions)
    }
}
