//! # Cinder Protocol: Wire Format
//!
//! This crate implements the peer-to-peer message layer for a Cinder
//! network node: the framing every message shares, the nine message
//! variants, and the parser that turns untrusted datagrams into typed
//! messages.
//!
//! ## Protocol Design
//!
//! Every message begins with a fixed 8-byte [`MessageHeader`] (raw
//! binary, Little Endian) carrying the network magic, three protocol
//! versions, a type byte and 16 extension bits. The payload that follows
//! is fixed-layout binary whose shape is determined entirely by the
//! header, so a receiver can route or reject a message from the first
//! 8 bytes alone.
//!
//! ## Implementation Notes
//!
//! - **Zero-Copy Header Parsing**: We use
//!   [`zerocopy`](https://docs.rs/zerocopy) to cast network bytes
//!   directly to [`MessageHeader`] structures. All 8-byte patterns are
//!   valid headers, so the cast itself cannot fail on content, only on
//!   length; judgement of the content belongs to the parser.
//!
//! - **One Buffer, One Status**: [`MessageParser::parse`] maps each
//!   received buffer to exactly one [`ParseStatus`] and at most one
//!   [`MessageVisitor`] dispatch. Every rejection is a distinct status,
//!   which feeds directly into peer scoring.
//!
//! - **Shared Decoded Objects**: Identical blocks and votes arriving
//!   from many peers are deduplicated into shared [`std::sync::Arc`]s by
//!   [`BlockUniquer`] and [`VoteUniquer`], keyed by content digest.
//!
//! ## Security Properties
//!
//! - **No Unsafe Deserialization**: All parsing uses `zerocopy` and
//!   checked reads with compile-time layout verification. Malformed
//!   buffers are rejected before any dispatch.
//!
//! - **Size Limits**: Buffers over 508 bytes (the largest safe single
//!   datagram) are rejected before any decoding work is done.
//!
//! - **Full Consumption**: A payload must use every byte of its buffer;
//!   trailing bytes invalidate the whole message. There are no lenient
//!   paths that skip validation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod block;
pub mod endpoint;
pub mod errors;
pub mod flags;
pub mod header;
pub mod messages;
pub mod network;
pub mod parser;
pub mod types;
pub mod uniquer;
pub mod visitor;
pub mod vote;
pub mod wire;
pub mod work;

pub use block::{decode_block, Block, ChangeBlock, OpenBlock, ReceiveBlock, SendBlock, StateBlock};
pub use endpoint::{parse_endpoint, AddressError, Endpoint};
pub use errors::{ProtocolError, Result};
pub use flags::{BulkPullFlags, HandshakeFlags};
pub use header::MessageHeader;
pub use messages::{
    BulkPull, BulkPullAccount, BulkPush, ConfirmAck, ConfirmReq, FrontierReq, Keepalive, Message,
    NodeIdHandshake, Publish,
};
pub use network::{Network, MAX_SAFE_MESSAGE_SIZE, PROTOCOL_VERSION, PROTOCOL_VERSION_MIN};
pub use parser::{MessageParser, ParseStatus};
pub use types::{Account, Amount, BlockHash, BlockType, MessageType, Signature};
pub use uniquer::{BlockUniquer, VoteUniquer};
pub use visitor::MessageVisitor;
pub use vote::{Vote, VoteEntry};
pub use work::{ThresholdWork, WorkVerifier};
