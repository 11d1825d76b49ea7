//! The nine message shapes of the Cinder wire protocol.
//!
//! Realtime messages (keepalive, publish, confirm_req, confirm_ack,
//! node_id_handshake) travel one per datagram and are self-delimiting;
//! bootstrap messages (frontier_req, bulk_pull, bulk_pull_account,
//! bulk_push) travel over dedicated TCP connections framed by
//! [`MessageHeader::payload_length_bytes`](crate::MessageHeader::payload_length_bytes).
//!
//! Every variant owns its header, its payload encode/decode, and value
//! equality over payload fields. Decoding takes the already-parsed
//! header plus a [`Reader`](crate::wire::Reader) positioned after it;
//! whoever drives the decode decides whether leftover bytes are fatal
//! (the datagram parser always treats them as such).

mod bootstrap;
mod confirm;
mod handshake;
mod keepalive;
mod publish;

pub use bootstrap::{BulkPull, BulkPullAccount, BulkPush, FrontierReq};
pub use confirm::{ConfirmAck, ConfirmReq};
pub use handshake::NodeIdHandshake;
pub use keepalive::Keepalive;
pub use publish::Publish;

use bytes::BufMut;

use crate::{header::MessageHeader, visitor::MessageVisitor};

/// Any decoded wire message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Peer liveness and address gossip
    Keepalive(Keepalive),
    /// Broadcast of a freshly minted block
    Publish(Publish),
    /// Request for votes on a block
    ConfirmReq(ConfirmReq),
    /// A representative's vote
    ConfirmAck(ConfirmAck),
    /// Bootstrap frontier enumeration request
    FrontierReq(FrontierReq),
    /// Bootstrap chain segment request
    BulkPull(BulkPull),
    /// Bootstrap pending-entries request
    BulkPullAccount(BulkPullAccount),
    /// Bootstrap push announcement
    BulkPush(BulkPush),
    /// Node identity handshake
    NodeIdHandshake(NodeIdHandshake),
}

impl Message {
    /// The message's header.
    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        match self {
            Self::Keepalive(m) => &m.header,
            Self::Publish(m) => &m.header,
            Self::ConfirmReq(m) => &m.header,
            Self::ConfirmAck(m) => &m.header,
            Self::FrontierReq(m) => &m.header,
            Self::BulkPull(m) => &m.header,
            Self::BulkPullAccount(m) => &m.header,
            Self::BulkPush(m) => &m.header,
            Self::NodeIdHandshake(m) => &m.header,
        }
    }

    /// Serialize header and payload.
    pub fn encode(&self, dst: &mut impl BufMut) {
        match self {
            Self::Keepalive(m) => m.encode(dst),
            Self::Publish(m) => m.encode(dst),
            Self::ConfirmReq(m) => m.encode(dst),
            Self::ConfirmAck(m) => m.encode(dst),
            Self::FrontierReq(m) => m.encode(dst),
            Self::BulkPull(m) => m.encode(dst),
            Self::BulkPullAccount(m) => m.encode(dst),
            Self::BulkPush(m) => m.encode(dst),
            Self::NodeIdHandshake(m) => m.encode(dst),
        }
    }

    /// Hand this message to the matching visitor capability.
    pub fn visit(&self, visitor: &mut dyn MessageVisitor) {
        match self {
            Self::Keepalive(m) => visitor.keepalive(m),
            Self::Publish(m) => visitor.publish(m),
            Self::ConfirmReq(m) => visitor.confirm_req(m),
            Self::ConfirmAck(m) => visitor.confirm_ack(m),
            Self::FrontierReq(m) => visitor.frontier_req(m),
            Self::BulkPull(m) => visitor.bulk_pull(m),
            Self::BulkPullAccount(m) => visitor.bulk_pull_account(m),
            Self::BulkPush(m) => visitor.bulk_push(m),
            Self::NodeIdHandshake(m) => visitor.node_id_handshake(m),
        }
    }
}
