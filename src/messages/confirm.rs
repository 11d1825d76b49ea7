//! Consensus confirmation: vote requests and votes.

use std::sync::Arc;

use bytes::BufMut;

use crate::{
    block::{decode_block, Block},
    errors::{ProtocolError, Result},
    header::MessageHeader,
    network::Network,
    types::MessageType,
    uniquer::{BlockUniquer, VoteUniquer},
    vote::Vote,
    wire::Reader,
};

/// Request for votes on one block.
///
/// Byte-for-byte the same payload shape as a publish: one block of the
/// kind named by the header's block-type bits.
#[derive(Debug, Clone)]
pub struct ConfirmReq {
    /// Message header, block-type bits matching the block
    pub header: MessageHeader,
    /// Block to be voted on
    pub block: Arc<Block>,
}

impl ConfirmReq {
    /// Request votes for a block.
    #[must_use]
    pub fn new(network: Network, block: Arc<Block>) -> Self {
        let mut header = MessageHeader::new(network, MessageType::ConfirmReq);
        header.set_block_type(block.block_type());
        Self { header, block }
    }

    /// Decode the block following an already-parsed header.
    pub fn decode(
        reader: &mut Reader<'_>,
        header: MessageHeader,
        uniquer: Option<&BlockUniquer>,
    ) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::ConfirmReq));
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

impl PartialEq for ConfirmReq {
    fn eq(&self, other: &Self) -> bool {
        self.block == other.block
    }
}

impl Eq for ConfirmReq {}

/// A representative's vote on one or more blocks.
///
/// The vote's encoding is parameterized by the kind of its first entry,
/// which the header's block-type bits announce: a hash-only first entry
/// forces `not_a_block`.
#[derive(Debug, Clone)]
pub struct ConfirmAck {
    /// Message header, block-type bits matching the vote's first entry
    pub header: MessageHeader,
    /// The vote, possibly a shared canonical instance
    pub vote: Arc<Vote>,
}

impl ConfirmAck {
    /// Wrap a vote for broadcast.
    #[must_use]
    pub fn new(network: Network, vote: Arc<Vote>) -> Self {
        let mut header = MessageHeader::new(network, MessageType::ConfirmAck);
        header.set_block_type(vote.first_block_type());
        Self { header, vote }
    }

    /// Decode the vote following an already-parsed header.
    ///
    /// The vote consumes the remainder of the stream by design; callers
    /// enforcing framing must hand in a reader that ends with the vote.
    pub fn decode(
        reader: &mut Reader<'_>,
        header: MessageHeader,
        uniquer: Option<&VoteUniquer>,
    ) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::ConfirmAck));
        let block_type = header
            .block_type()
            .ok_or(ProtocolError::InvalidBlockType(header.block_type_bits()))?;
        let vote = Arc::new(Vote::decode(reader, block_type)?);
        let vote = match uniquer {
            Some(uniquer) => uniquer.unique(vote),
            None => vote,
        };
        Ok(Self { header, vote })
    }

    /// Serialize header and vote.
    pub fn encode(&self, dst: &mut impl BufMut) {
        debug_assert_eq!(self.header.block_type(), Some(self.vote.first_block_type()));
        dst.put_slice(&self.header.to_bytes());
        self.vote.encode(dst);
    }
}

impl PartialEq for ConfirmAck {
    fn eq(&self, other: &Self) -> bool {
        self.vote == other.vote
    }
}

impl Eq for ConfirmAck {}
