//! Block broadcast.

use std::sync::Arc;

use bytes::BufMut;

use crate::{
    block::{decode_block, Block},
    errors::{ProtocolError, Result},
    header::MessageHeader,
    network::Network,
    types::MessageType,
    uniquer::BlockUniquer,
    wire::Reader,
};

/// Publish message carrying one freshly minted block.
///
/// The block's kind is not part of the payload; it rides in the header's
/// block-type bits, so the payload is exactly one block encoding of that
/// kind.
#[derive(Debug, Clone)]
pub struct Publish {
    /// Message header, block-type bits matching the block
    pub header: MessageHeader,
    /// The block being broadcast, possibly a shared canonical instance
    pub block: Arc<Block>,
}

impl Publish {
    /// Publish a block.
    #[must_use]
    pub fn new(network: Network, block: Arc<Block>) -> Self {
        let mut header = MessageHeader::new(network, MessageType::Publish);
        header.set_block_type(block.block_type());
        Self { header, block }
    }

    /// Decode the block following an already-parsed header, taking its
    /// kind from the header's block-type bits.
    ///
    /// When a uniquer is supplied the decoded block is canonicalized
    /// through it.
    pub fn decode(
        reader: &mut Reader<'_>,
        header: MessageHeader,
        uniquer: Option<&BlockUniquer>,
    ) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::Publish));
        let block_type = header
            .block_type()
            .ok_or(ProtocolError::InvalidBlockType(header.block_type_bits()))?;
        let block = decode_block(reader, block_type, uniquer)?;
        Ok(Self { header, block })
    }

    /// Serialize header and block.
    pub fn encode(&self, dst: &mut impl BufMut) {
        debug_assert_eq!(self.header.block_type(), Some(self.block.block_type()));
        dst.put_slice(&self.header.to_bytes());
        self.block.encode(dst);
    }
}

impl PartialEq for Publish {
    fn eq(&self, other: &Self) -> bool {
        self.block == other.block
    }
}

impl Eq for Publish {}
