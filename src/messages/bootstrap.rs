//! Bootstrap messages, exchanged over dedicated TCP connections.
//!
//! These are the framed message types: a bootstrap server reads the
//! 8-byte header, asks it for
//! [`payload_length_bytes`](crate::MessageHeader::payload_length_bytes),
//! then reads exactly that many payload bytes before decoding.

use bytes::BufMut;

use crate::{
    errors::{ProtocolError, Result},
    flags::BulkPullFlags,
    header::MessageHeader,
    network::Network,
    types::{Account, Amount, BlockHash, MessageType},
    wire::Reader,
};

/// Request to enumerate account frontiers.
#[derive(Debug, Clone)]
pub struct FrontierReq {
    /// Message header
    pub header: MessageHeader,
    /// First account to report, inclusive
    pub start: Account,
    /// Maximum frontier age in seconds, `u32::MAX` for no bound
    pub age: u32,
    /// Maximum number of frontiers to return, `u32::MAX` for no bound
    pub count: u32,
}

impl FrontierReq {
    /// Payload size: 32-byte account + 4-byte age + 4-byte count
    pub const SIZE: usize = 40;

    /// Request frontiers starting at an account.
    #[must_use]
    pub fn new(network: Network, start: Account, age: u32, count: u32) -> Self {
        Self { header: MessageHeader::new(network, MessageType::FrontierReq), start, age, count }
    }

    /// Decode the payload following an already-parsed header.
    pub fn decode(reader: &mut Reader<'_>, header: MessageHeader) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::FrontierReq));
        Ok(Self {
            header,
            start: reader.read_array()?,
            age: reader.read_u32_le()?,
            count: reader.read_u32_le()?,
        })
    }

    /// Serialize header and payload.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.start);
        dst.put_u32_le(self.age);
        dst.put_u32_le(self.count);
    }
}

impl PartialEq for FrontierReq {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.age == other.age && self.count == other.count
    }
}

impl Eq for FrontierReq {}

/// Request for a segment of an account chain.
///
/// `start` may be an account (pull from the frontier) or a block hash;
/// `end` is the hash to stop at, all zeroes for the whole chain. A
/// non-zero `count` limits the number of returned blocks and is carried
/// in an extended-parameters trailer gated by the header's
/// count-present bit. Count zero means "all blocks" and is the same as
/// omitting the trailer, so encoding never sets the bit for it.
#[derive(Debug, Clone)]
pub struct BulkPull {
    /// Message header, count-present bit matching `count`
    pub header: MessageHeader,
    /// Account or block hash to start from
    pub start: [u8; 32],
    /// Block hash to stop at, all zeroes for no bound
    pub end: BlockHash,
    /// Maximum number of blocks, zero for no bound
    pub count: u32,
}

impl BulkPull {
    /// Base payload size: 32-byte start + 32-byte end
    pub const SIZE: usize = 64;

    /// Extended parameters trailer: 1 reserved byte + 7 count bytes
    pub const EXTENDED_PARAMETERS_SIZE: usize = 8;

    /// Request a chain segment.
    #[must_use]
    pub fn new(network: Network, start: [u8; 32], end: BlockHash, count: u32) -> Self {
        let mut message = Self {
            header: MessageHeader::new(network, MessageType::BulkPull),
            start,
            end,
            count: 0,
        };
        message.set_count(count);
        message
    }

    /// True when the header announces the extended-parameters trailer.
    #[must_use]
    pub fn is_count_present(&self) -> bool {
        self.header
            .bulk_pull_flags()
            .is_some_and(|flags| flags.contains(BulkPullFlags::COUNT_PRESENT))
    }

    /// Set the count limit, keeping the header bit in step: the bit is
    /// set exactly when the count is non-zero.
    pub fn set_count(&mut self, count: u32) {
        self.count = count;
        let bit = BulkPullFlags::COUNT_PRESENT.bits();
        let extensions = self.header.extensions();
        self.header.set_extensions(if count == 0 {
            extensions & !bit
        } else {
            extensions | bit
        });
    }

    /// Decode the payload following an already-parsed header.
    ///
    /// The extended-parameters trailer is read only when the header's
    /// count-present bit is set; its first byte is reserved and must be
    /// zero.
    pub fn decode(reader: &mut Reader<'_>, header: MessageHeader) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::BulkPull));
        let start = reader.read_array()?;
        let end = reader.read_array()?;

        let count_present = header
            .bulk_pull_flags()
            .is_some_and(|flags| flags.contains(BulkPullFlags::COUNT_PRESENT));
        let count = if count_present {
            let extended: [u8; Self::EXTENDED_PARAMETERS_SIZE] = reader.read_array()?;
            if extended[0] != 0 {
                return Err(ProtocolError::ReservedByteNonZero(extended[0]));
            }
            u32::from_le_bytes([extended[1], extended[2], extended[3], extended[4]])
        } else {
            0
        };

        Ok(Self { header, start, end, count })
    }

    /// Serialize header and payload.
    pub fn encode(&self, dst: &mut impl BufMut) {
        debug_assert_eq!(self.count != 0, self.is_count_present());
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.start);
        dst.put_slice(&self.end);

        if self.is_count_present() {
            let mut extended = [0u8; Self::EXTENDED_PARAMETERS_SIZE];
            extended[1..5].copy_from_slice(&self.count.to_le_bytes());
            dst.put_slice(&extended);
        }
    }
}

impl PartialEq for BulkPull {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.count == other.count
    }
}

impl Eq for BulkPull {}

/// Request for the pending (unreceived) entries of one account.
#[derive(Debug, Clone)]
pub struct BulkPullAccount {
    /// Message header
    pub header: MessageHeader,
    /// Account to report pending entries for
    pub account: Account,
    /// Ignore pending entries below this amount
    pub minimum_amount: Amount,
    /// Response shaping flags, opaque at this layer
    pub flags: u8,
}

impl BulkPullAccount {
    /// Payload size: 32-byte account + 16-byte amount + 1-byte flags
    pub const SIZE: usize = 49;

    /// Request pending entries for an account.
    #[must_use]
    pub fn new(network: Network, account: Account, minimum_amount: Amount, flags: u8) -> Self {
        Self {
            header: MessageHeader::new(network, MessageType::BulkPullAccount),
            account,
            minimum_amount,
            flags,
        }
    }

    /// Decode the payload following an already-parsed header.
    pub fn decode(reader: &mut Reader<'_>, header: MessageHeader) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::BulkPullAccount));
        Ok(Self {
            header,
            account: reader.read_array()?,
            minimum_amount: reader.read_array()?,
            flags: reader.read_u8()?,
        })
    }

    /// Serialize header and payload.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.account);
        dst.put_slice(&self.minimum_amount);
        dst.put_u8(self.flags);
    }
}

impl PartialEq for BulkPullAccount {
    fn eq(&self, other: &Self) -> bool {
        self.account == other.account
            && self.minimum_amount == other.minimum_amount
            && self.flags == other.flags
    }
}

impl Eq for BulkPullAccount {}

/// Announcement that the sender will push blocks; carries no payload.
#[derive(Debug, Clone)]
pub struct BulkPush {
    /// Message header
    pub header: MessageHeader,
}

impl BulkPush {
    /// Announce a push.
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self { header: MessageHeader::new(network, MessageType::BulkPush) }
    }

    /// Nothing to read; the header is the whole message.
    pub fn decode(_reader: &mut Reader<'_>, header: MessageHeader) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::BulkPush));
        Ok(Self { header })
    }

    /// Serialize the header.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
    }
}

impl PartialEq for BulkPush {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for BulkPush {}
