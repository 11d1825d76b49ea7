//! Ledger block framing.
//!
//! The wire layer only frames blocks: it knows their exact byte layout,
//! their kind, their embedded proof-of-work value and the root that work
//! is attached to. Cryptographic verification and ledger rules live in
//! the validation engine, behind the [`WorkVerifier`](crate::WorkVerifier)
//! seam and beyond.
//!
//! Block kinds form a closed set keyed by [`BlockType`]; there is no
//! open-ended subclassing and no default arm that could mishandle an
//! unknown kind.

use std::sync::Arc;

use bytes::BufMut;

use crate::{
    errors::{ProtocolError, Result},
    types::{Account, Amount, BlockHash, BlockType, Signature},
    uniquer::BlockUniquer,
    wire::Reader,
};

/// Legacy send block (152 bytes on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SendBlock {
    /// Hash of the previous block in the account chain
    pub previous: BlockHash,
    /// Account receiving the funds
    pub destination: Account,
    /// Balance remaining after the send
    pub balance: Amount,
    /// Signature over the block contents
    pub signature: Signature,
    /// Proof-of-work nonce attached to `previous`
    pub work: u64,
}

/// Legacy receive block (136 bytes on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiveBlock {
    /// Hash of the previous block in the account chain
    pub previous: BlockHash,
    /// Hash of the send block being received
    pub source: BlockHash,
    /// Signature over the block contents
    pub signature: Signature,
    /// Proof-of-work nonce attached to `previous`
    pub work: u64,
}

/// Legacy open block (168 bytes on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpenBlock {
    /// Hash of the send block that funds the new account
    pub source: BlockHash,
    /// Representative chosen by the account
    pub representative: Account,
    /// The account being opened
    pub account: Account,
    /// Signature over the block contents
    pub signature: Signature,
    /// Proof-of-work nonce attached to the account
    pub work: u64,
}

/// Legacy representative change block (136 bytes on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeBlock {
    /// Hash of the previous block in the account chain
    pub previous: BlockHash,
    /// New representative
    pub representative: Account,
    /// Signature over the block contents
    pub signature: Signature,
    /// Proof-of-work nonce attached to `previous`
    pub work: u64,
}

/// Universal state block (216 bytes on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateBlock {
    /// Account the block belongs to
    pub account: Account,
    /// Hash of the previous block, all zeroes for the first block
    pub previous: BlockHash,
    /// Representative chosen by the account
    pub representative: Account,
    /// Resulting balance
    pub balance: Amount,
    /// Send destination or receive source, depending on balance delta
    pub link: [u8; 32],
    /// Signature over the block contents
    pub signature: Signature,
    /// Proof-of-work nonce attached to the root
    pub work: u64,
}

/// A ledger block, closed over the wire block kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Block {
    /// Legacy send
    Send(SendBlock),
    /// Legacy receive
    Receive(ReceiveBlock),
    /// Legacy open
    Open(OpenBlock),
    /// Legacy representative change
    Change(ChangeBlock),
    /// Universal state block
    State(StateBlock),
}

impl Block {
    /// Kind tag for this block, as carried in header extension bits 8-11.
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Send(_) => BlockType::Send,
            Self::Receive(_) => BlockType::Receive,
            Self::Open(_) => BlockType::Open,
            Self::Change(_) => BlockType::Change,
            Self::State(_) => BlockType::State,
        }
    }

    /// Embedded proof-of-work nonce.
    #[must_use]
    pub fn work(&self) -> u64 {
        match self {
            Self::Send(b) => b.work,
            Self::Receive(b) => b.work,
            Self::Open(b) => b.work,
            Self::Change(b) => b.work,
            Self::State(b) => b.work,
        }
    }

    /// The value the proof-of-work nonce must cover: the previous block
    /// hash, or the account itself for the first block in a chain.
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        match self {
            Self::Send(b) => b.previous,
            Self::Receive(b) => b.previous,
            Self::Change(b) => b.previous,
            Self::Open(b) => b.account,
            Self::State(b) => {
                if b.previous == [0u8; 32] {
                    b.account
                } else {
                    b.previous
                }
            }
        }
    }

    /// Serialize the block in its fixed wire layout.
    pub fn encode(&self, dst: &mut impl BufMut) {
        match self {
            Self::Send(b) => {
                dst.put_slice(&b.previous);
                dst.put_slice(&b.destination);
                dst.put_slice(&b.balance);
                dst.put_slice(&b.signature);
                dst.put_u64_le(b.work);
            }
            Self::Receive(b) => {
                dst.put_slice(&b.previous);
                dst.put_slice(&b.source);
                dst.put_slice(&b.signature);
                dst.put_u64_le(b.work);
            }
            Self::Open(b) => {
                dst.put_slice(&b.source);
                dst.put_slice(&b.representative);
                dst.put_slice(&b.account);
                dst.put_slice(&b.signature);
                dst.put_u64_le(b.work);
            }
            Self::Change(b) => {
                dst.put_slice(&b.previous);
                dst.put_slice(&b.representative);
                dst.put_slice(&b.signature);
                dst.put_u64_le(b.work);
            }
            Self::State(b) => {
                dst.put_slice(&b.account);
                dst.put_slice(&b.previous);
                dst.put_slice(&b.representative);
                dst.put_slice(&b.balance);
                dst.put_slice(&b.link);
                dst.put_slice(&b.signature);
                dst.put_u64_le(b.work);
            }
        }
    }

    /// Decode a block of a known kind.
    ///
    /// The kind comes from the message header, not from the stream; a
    /// `not_a_block` tag is not decodable and is rejected here.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::InvalidBlockType`] for `not_a_block`,
    /// [`ProtocolError::UnexpectedEof`] on a short stream.
    pub fn decode(reader: &mut Reader<'_>, block_type: BlockType) -> Result<Self> {
        match block_type {
            BlockType::NotABlock => {
                Err(ProtocolError::InvalidBlockType(BlockType::NotABlock.to_u8()))
            }
            BlockType::Send => Ok(Self::Send(SendBlock {
                previous: reader.read_array()?,
                destination: reader.read_array()?,
                balance: reader.read_array()?,
                signature: reader.read_array()?,
                work: reader.read_u64_le()?,
            })),
            BlockType::Receive => Ok(Self::Receive(ReceiveBlock {
                previous: reader.read_array()?,
                source: reader.read_array()?,
                signature: reader.read_array()?,
                work: reader.read_u64_le()?,
            })),
            BlockType::Open => Ok(Self::Open(OpenBlock {
                source: reader.read_array()?,
                representative: reader.read_array()?,
                account: reader.read_array()?,
                signature: reader.read_array()?,
                work: reader.read_u64_le()?,
            })),
            BlockType::Change => Ok(Self::Change(ChangeBlock {
                previous: reader.read_array()?,
                representative: reader.read_array()?,
                signature: reader.read_array()?,
                work: reader.read_u64_le()?,
            })),
            BlockType::State => Ok(Self::State(StateBlock {
                account: reader.read_array()?,
                previous: reader.read_array()?,
                representative: reader.read_array()?,
                balance: reader.read_array()?,
                link: reader.read_array()?,
                signature: reader.read_array()?,
                work: reader.read_u64_le()?,
            })),
        }
    }

    /// Content digest over the encoded bytes, used as the dedup cache key.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut encoded = Vec::new();
        self.encode(&mut encoded);
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.block_type().to_u8()]);
        hasher.update(&encoded);
        *hasher.finalize().as_bytes()
    }
}

/// Decode a block and canonicalize it through the dedup cache when one
/// is supplied.
///
/// Repeatedly gossiped blocks then share a single allocation instead of
/// one per received copy.
pub fn decode_block(
    reader: &mut Reader<'_>,
    block_type: BlockType,
    uniquer: Option<&BlockUniquer>,
) -> Result<Arc<Block>> {
    let block = Arc::new(Block::decode(reader, block_type)?);
    Ok(match uniquer {
        Some(uniquer) => uniquer.unique(block),
        None => block,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn arbitrary_bytes<const N: usize>() -> impl Strategy<Value = [u8; N]> {
        prop::collection::vec(any::<u8>(), N).prop_map(|v| {
            let mut arr = [0u8; N];
            arr.copy_from_slice(&v);
            arr
        })
    }

    impl Arbitrary for Block {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            let send = (
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<16>(),
                arbitrary_bytes::<64>(),
                any::<u64>(),
            )
                .prop_map(|(previous, destination, balance, signature, work)| {
                    Block::Send(SendBlock { previous, destination, balance, signature, work })
                });
            let receive =
                (arbitrary_bytes::<32>(), arbitrary_bytes::<32>(), arbitrary_bytes::<64>(), any::<u64>())
                    .prop_map(|(previous, source, signature, work)| {
                        Block::Receive(ReceiveBlock { previous, source, signature, work })
                    });
            let open = (
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<64>(),
                any::<u64>(),
            )
                .prop_map(|(source, representative, account, signature, work)| {
                    Block::Open(OpenBlock { source, representative, account, signature, work })
                });
            let change =
                (arbitrary_bytes::<32>(), arbitrary_bytes::<32>(), arbitrary_bytes::<64>(), any::<u64>())
                    .prop_map(|(previous, representative, signature, work)| {
                        Block::Change(ChangeBlock { previous, representative, signature, work })
                    });
            let state = (
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<16>(),
                arbitrary_bytes::<32>(),
                arbitrary_bytes::<64>(),
                any::<u64>(),
            )
                .prop_map(
                    |(account, previous, representative, balance, link, signature, work)| {
                        Block::State(StateBlock {
                            account,
                            previous,
                            representative,
                            balance,
                            link,
                            signature,
                            work,
                        })
                    },
                );
            prop_oneof![send, receive, open, change, state].boxed()
        }
    }

    proptest! {
        #[test]
        fn block_round_trip(block in any::<Block>()) {
            let mut wire = Vec::new();
            block.encode(&mut wire);

            let mut reader = Reader::new(&wire);
            let parsed = Block::decode(&mut reader, block.block_type()).expect("should decode");
            prop_assert!(reader.is_exhausted());
            prop_assert_eq!(block, parsed);
        }

        #[test]
        fn truncated_block_rejected(block in any::<Block>()) {
            let mut wire = Vec::new();
            block.encode(&mut wire);
            wire.pop();

            let mut reader = Reader::new(&wire);
            prop_assert!(Block::decode(&mut reader, block.block_type()).is_err());
        }
    }

    #[test]
    fn wire_sizes() {
        let sizes = [
            (BlockType::Send, 152),
            (BlockType::Receive, 136),
            (BlockType::Open, 168),
            (BlockType::Change, 136),
            (BlockType::State, 216),
        ];
        for (block_type, size) in sizes {
            let mut reader = Reader::new(&[0u8; 256]);
            Block::decode(&mut reader, block_type).unwrap();
            assert_eq!(256 - reader.remaining(), size, "{block_type:?}");
        }
    }

    #[test]
    fn not_a_block_is_not_decodable() {
        let mut reader = Reader::new(&[0u8; 256]);
        assert_eq!(
            Block::decode(&mut reader, BlockType::NotABlock),
            Err(ProtocolError::InvalidBlockType(0x01))
        );
    }

    #[test]
    fn open_work_covers_the_account() {
        let block = Block::Open(OpenBlock {
            source: [1u8; 32],
            representative: [2u8; 32],
            account: [3u8; 32],
            signature: [4u8; 64],
            work: 0,
        });
        assert_eq!(block.root(), [3u8; 32]);
    }

    #[test]
    fn state_work_root_falls_back_to_account() {
        let mut block = StateBlock {
            account: [3u8; 32],
            previous: [0u8; 32],
            representative: [2u8; 32],
            balance: [0u8; 16],
            link: [0u8; 32],
            signature: [4u8; 64],
            work: 0,
        };
        assert_eq!(Block::State(block.clone()).root(), [3u8; 32]);
        block.previous = [5u8; 32];
        assert_eq!(Block::State(block).root(), [5u8; 32]);
    }
}
