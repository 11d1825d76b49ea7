//! Representative votes.
//!
//! A vote is a signed, sequenced endorsement of one or more blocks. On
//! the wire its entry list is typed by the message header's block-type
//! tag: the first entry is a full block of that kind, or a bare 32-byte
//! hash when the tag is `not_a_block`. Every later entry is always a
//! hash, and the list runs to the end of the stream.

use std::sync::Arc;

use bytes::BufMut;

use crate::{
    block::Block,
    errors::{ProtocolError, Result},
    types::{Account, BlockHash, BlockType, Signature},
    wire::Reader,
};

/// One element of a vote's entry list: a full block or just its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteEntry {
    /// A complete block, carried inline
    Block(Arc<Block>),
    /// A block referenced by hash only
    Hash(BlockHash),
}

impl VoteEntry {
    /// Header tag this entry dictates when it leads the list.
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Block(block) => block.block_type(),
            Self::Hash(_) => BlockType::NotABlock,
        }
    }
}

/// A signed list of block references.
///
/// # Invariants
///
/// - The entry list is never empty.
/// - Only the first entry may be a full block; the wire format has no
///   way to delimit a second one. [`Vote::new`] enforces both so that
///   every constructed vote is encodable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Voting account
    pub account: Account,
    /// Signature over account, sequence and entries
    pub signature: Signature,
    /// Monotonic sequence number for replay ordering
    pub sequence: u64,
    entries: Vec<VoteEntry>,
}

impl Vote {
    /// Build a vote, validating the entry-list invariants.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::MalformedVote`] when the list is empty or a
    /// non-leading entry carries a full block.
    pub fn new(
        account: Account,
        signature: Signature,
        sequence: u64,
        entries: Vec<VoteEntry>,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(ProtocolError::MalformedVote("entry list is empty"));
        }
        if entries[1..].iter().any(|entry| matches!(entry, VoteEntry::Block(_))) {
            return Err(ProtocolError::MalformedVote("only the first entry may be a block"));
        }
        Ok(Self { account, signature, sequence, entries })
    }

    /// The block references this vote endorses.
    #[must_use]
    pub fn entries(&self) -> &[VoteEntry] {
        &self.entries
    }

    /// Block-type tag the containing message header must carry.
    #[must_use]
    pub fn first_block_type(&self) -> BlockType {
        self.entries[0].block_type()
    }

    /// Serialize for a header whose block-type tag matches
    /// [`Vote::first_block_type`].
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.account);
        dst.put_slice(&self.signature);
        dst.put_u64_le(self.sequence);
        for entry in &self.entries {
            match entry {
                VoteEntry::Block(block) => block.encode(dst),
                VoteEntry::Hash(hash) => dst.put_slice(hash),
            }
        }
    }

    /// Decode a vote whose first entry has the given kind.
    ///
    /// Hash entries are read until the stream is exhausted; a tail that
    /// is not a whole number of hashes is a short read and rejects the
    /// vote.
    pub fn decode(reader: &mut Reader<'_>, block_type: BlockType) -> Result<Self> {
        let account = reader.read_array()?;
        let signature = reader.read_array()?;
        let sequence = reader.read_u64_le()?;

        let first = match block_type {
            BlockType::NotABlock => VoteEntry::Hash(reader.read_array()?),
            _ => VoteEntry::Block(Arc::new(Block::decode(reader, block_type)?)),
        };
        let mut entries = vec![first];
        while !reader.is_exhausted() {
            entries.push(VoteEntry::Hash(reader.read_array()?));
        }

        Ok(Self { account, signature, sequence, entries })
    }

    /// Content digest over the encoded vote, used as the dedup cache key.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut encoded = Vec::new();
        self.encode(&mut encoded);
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.first_block_type().to_u8()]);
        hasher.update(&encoded);
        *hasher.finalize().as_bytes()
    }
}
