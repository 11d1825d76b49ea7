//! Message header implementation with zero-copy parsing.
//!
//! The `MessageHeader` is a fixed 8-byte structure serialized as raw
//! binary. Every message on the Cinder network starts with one, and it
//! alone determines how the rest of the buffer is interpreted.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    errors::{ProtocolError, Result},
    flags::{BulkPullFlags, HandshakeFlags},
    messages::{BulkPull, BulkPullAccount, FrontierReq},
    network::{Network, PROTOCOL_VERSION, PROTOCOL_VERSION_MIN},
    types::{BlockType, MessageType},
};

/// Fixed 8-byte message header
///
/// Fields are stored as raw byte arrays to avoid alignment issues with
/// `#[repr(C, packed)]`; the extensions field is little-endian like every
/// multi-byte integer on this wire.
///
/// # The extensions field
///
/// `extensions` is one 16-bit store with two layers of meaning:
///
/// - **Bits 8-11** always encode a [`BlockType`] tag, whatever the
///   message type. This is the only cross-cutting sub-field and the only
///   one with accessors on the header itself.
///
/// - **All other bits are reinterpreted per message type.** A `bulk_pull`
///   reads bit 0 as "extended count present"; a `node_id_handshake`
///   reads bits 0-1 as "query present" / "response present". The same
///   bit pattern means different things under a different `type` byte,
///   so the typed views ([`BulkPullFlags`], [`HandshakeFlags`]) are only
///   handed out when the header's own type matches.
///
/// # Security Properties
///
/// - **Zero-Copy Safety**: The `#[repr(C, packed)]` layout with
///   `zerocopy` traits ensures this struct can be safely cast from
///   untrusted network bytes. All 8-byte patterns are valid, so casting
///   garbage cannot cause undefined behavior.
///
/// - **No Early Judgement**: [`MessageHeader::from_bytes`] fails only on
///   a short buffer. Magic, network, version and type validity are
///   judged by the parser on the wire values so that each failure maps
///   to its own terminal status.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct MessageHeader {
    magic: [u8; 2], // ['C', network id byte]
    version_max: u8,
    version_using: u8,
    version_min: u8,
    message_type: u8,
    extensions: [u8; 2], // u16 LE, bits 8-11 reserved for the block type
}

impl MessageHeader {
    /// Size of the serialized header (8 bytes)
    pub const SIZE: usize = 8;

    /// First magic byte, shared by every Cinder network
    pub const MAGIC: u8 = b'C';

    /// Extension bits that always carry the block-type tag
    pub const BLOCK_TYPE_MASK: u16 = 0x0F00;

    /// Create a header for an outgoing message on the given network.
    #[must_use]
    pub fn new(network: Network, message_type: MessageType) -> Self {
        Self {
            magic: [Self::MAGIC, network.id_byte()],
            version_max: PROTOCOL_VERSION,
            version_using: PROTOCOL_VERSION,
            version_min: PROTOCOL_VERSION_MIN,
            message_type: message_type.to_u8(),
            extensions: [0; 2],
        }
    }

    /// Parse a header from network bytes (zero-copy, safe)
    ///
    /// Casts the buffer prefix directly to a `MessageHeader` reference
    /// using compile-time layout verification from `zerocopy`. No data
    /// is copied and no field is validated beyond the length check;
    /// the parser owns the magic/network/version/type judgement.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::HeaderTooShort`] if fewer than 8 bytes
    /// are available.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::HeaderTooShort {
                expected: Self::SIZE,
                actual: bytes.len(),
            })?
            .0;
        Ok(header)
    }

    /// Serialize the header to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)] // Common serialization pattern
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Raw magic bytes
    #[must_use]
    pub fn magic(&self) -> [u8; 2] {
        self.magic
    }

    /// True when the first magic byte identifies the Cinder protocol
    #[must_use]
    pub fn valid_magic(&self) -> bool {
        self.magic[0] == Self::MAGIC
    }

    /// True when the second magic byte matches the given network
    #[must_use]
    pub fn valid_network(&self, network: Network) -> bool {
        self.magic[1] == network.id_byte()
    }

    /// Highest protocol version the sender speaks
    #[must_use]
    pub fn version_max(&self) -> u8 {
        self.version_max
    }

    /// Protocol version the sender used for this message
    #[must_use]
    pub fn version_using(&self) -> u8 {
        self.version_using
    }

    /// Oldest protocol version the sender still accepts
    #[must_use]
    pub fn version_min(&self) -> u8 {
        self.version_min
    }

    /// Override the version this message claims to be encoded with.
    ///
    /// Used when replying to a peer that negotiated down.
    pub fn set_version_using(&mut self, version: u8) {
        self.version_using = version;
    }

    /// Raw message-type byte as received
    #[must_use]
    pub fn message_type_raw(&self) -> u8 {
        self.message_type
    }

    /// Message type as an enum (if the wire value is known)
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u8(self.message_type)
    }

    /// Full extensions field
    #[must_use]
    pub fn extensions(&self) -> u16 {
        u16::from_le_bytes(self.extensions)
    }

    /// Overwrite the full extensions field
    pub fn set_extensions(&mut self, value: u16) {
        self.extensions = value.to_le_bytes();
    }

    /// Raw block-type bits (8-11) as received
    #[must_use]
    pub fn block_type_bits(&self) -> u8 {
        ((self.extensions() & Self::BLOCK_TYPE_MASK) >> 8) as u8
    }

    /// Block-type tag, if bits 8-11 hold a known value
    #[must_use]
    pub fn block_type(&self) -> Option<BlockType> {
        BlockType::from_u8(self.block_type_bits())
    }

    /// Rewrite bits 8-11, leaving every other extension bit untouched.
    pub fn set_block_type(&mut self, block_type: BlockType) {
        let cleared = self.extensions() & !Self::BLOCK_TYPE_MASK;
        self.set_extensions(cleared | (u16::from(block_type.to_u8()) << 8));
    }

    /// Bulk-pull view of the extension bits
    ///
    /// Returns `None` unless this header's type is `bulk_pull`; the bits
    /// have no bulk-pull meaning under any other type.
    #[must_use]
    pub fn bulk_pull_flags(&self) -> Option<BulkPullFlags> {
        (self.message_type() == Some(MessageType::BulkPull))
            .then(|| BulkPullFlags::from_extensions(self.extensions()))
    }

    /// Handshake view of the extension bits
    ///
    /// Returns `None` unless this header's type is `node_id_handshake`.
    #[must_use]
    pub fn handshake_flags(&self) -> Option<HandshakeFlags> {
        (self.message_type() == Some(MessageType::NodeIdHandshake))
            .then(|| HandshakeFlags::from_extensions(self.extensions()))
    }

    /// Exact payload length for types framed with an up-front byte count.
    ///
    /// Bootstrap connections read the header first and then need to know
    /// how many payload bytes to wait for. Realtime types are
    /// self-delimiting within their datagram and return `None`.
    #[must_use]
    pub fn payload_length_bytes(&self) -> Option<usize> {
        match self.message_type()? {
            MessageType::BulkPull => {
                let extended = self
                    .bulk_pull_flags()
                    .is_some_and(|flags| flags.contains(BulkPullFlags::COUNT_PRESENT));
                Some(BulkPull::SIZE + if extended { BulkPull::EXTENDED_PARAMETERS_SIZE } else { 0 })
            }
            // bulk_push doesn't have a payload
            MessageType::BulkPush => Some(0),
            MessageType::FrontierReq => Some(FrontierReq::SIZE),
            MessageType::BulkPullAccount => Some(BulkPullAccount::SIZE),
            _ => None,
        }
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for MessageHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageHeader")
            .field("magic", &self.magic())
            .field("version_max", &self.version_max())
            .field("version_using", &self.version_using())
            .field("version_min", &self.version_min())
            .field("message_type", &self.message_type())
            .field("extensions", &format!("{:#06x}", self.extensions()))
            .finish()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for MessageHeader {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for MessageHeader {}
