//! Wire tags and primitive field types.
//!
//! Tags are closed enums with explicit wire values. The numbering is
//! gapped: values 0 and 1 are reserved and 9 belonged to a retired
//! message, so `from_u8` is total and returns `None` for them. Messages
//! with unknown tags MUST be rejected, not silently ignored.

/// A 32-byte public account identifier.
pub type Account = [u8; 32];

/// A 32-byte block hash.
pub type BlockHash = [u8; 32];

/// A 64-byte signature.
pub type Signature = [u8; 64];

/// A 128-bit balance, kept as opaque wire bytes.
pub type Amount = [u8; 16];

/// Message type tag carried in the sixth header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Peer liveness and address gossip
    Keepalive = 0x02,
    /// Broadcast of a freshly minted block
    Publish = 0x03,
    /// Request for votes on a block
    ConfirmReq = 0x04,
    /// A representative's vote
    ConfirmAck = 0x05,
    /// Bootstrap: pull a chain segment
    BulkPull = 0x06,
    /// Bootstrap: push blocks to a peer
    BulkPush = 0x07,
    /// Bootstrap: enumerate account frontiers
    FrontierReq = 0x08,
    /// Node identity handshake
    NodeIdHandshake = 0x0A,
    /// Bootstrap: pull pending entries for an account
    BulkPullAccount = 0x0B,
}

impl MessageType {
    /// Convert to the raw wire value
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from a raw wire value
    ///
    /// Returns `None` for reserved and retired values; callers surface
    /// those as an invalid-message-type condition.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(Self::Keepalive),
            0x03 => Some(Self::Publish),
            0x04 => Some(Self::ConfirmReq),
            0x05 => Some(Self::ConfirmAck),
            0x06 => Some(Self::BulkPull),
            0x07 => Some(Self::BulkPush),
            0x08 => Some(Self::FrontierReq),
            0x0A => Some(Self::NodeIdHandshake),
            0x0B => Some(Self::BulkPullAccount),
            _ => None,
        }
    }
}

/// Ledger block kind, also used as the header's block-type sub-field.
///
/// `NotABlock` is a valid tag on the wire: a vote whose first entry is a
/// bare hash carries it in the header. It is never a decodable block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    /// Hash-only placeholder, not an actual block
    NotABlock = 0x01,
    /// Legacy send block
    Send = 0x02,
    /// Legacy receive block
    Receive = 0x03,
    /// Legacy open block
    Open = 0x04,
    /// Legacy representative change block
    Change = 0x05,
    /// Universal state block
    State = 0x06,
}

impl BlockType {
    /// Convert to the raw wire value
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from a raw wire value
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::NotABlock),
            0x02 => Some(Self::Send),
            0x03 => Some(Self::Receive),
            0x04 => Some(Self::Open),
            0x05 => Some(Self::Change),
            0x06 => Some(Self::State),
            _ => None,
        }
    }
}
