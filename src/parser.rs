//! Datagram parser: the node's only contact with adversarial input.
//!
//! One call to [`MessageParser::parse`] turns one received buffer into at
//! most one visitor dispatch. Validation runs in a fixed order (size,
//! header, version, magic, network, type, payload, full consumption,
//! proof of work) and the first failure short-circuits into a terminal
//! [`ParseStatus`]. Structural payload failures are deliberately not
//! distinguished from truncation or trailing garbage: each variant
//! collapses to its single `invalid_*_message` status, and only the
//! header-level gates and the work check get their own codes.
//!
//! Parsing is synchronous and takes no locks; the parser owns nothing
//! mutable between calls beyond the shared dedup caches and work
//! verifier, which are themselves safe for concurrent use. One parser
//! can serve every connection.

use std::sync::Arc;

use crate::{
    header::MessageHeader,
    messages::{ConfirmAck, ConfirmReq, Keepalive, NodeIdHandshake, Publish},
    network::Network,
    types::MessageType,
    uniquer::{BlockUniquer, VoteUniquer},
    visitor::MessageVisitor,
    vote::VoteEntry,
    wire::Reader,
    work::WorkVerifier,
};

/// Terminal outcome of parsing one buffer.
///
/// Statuses are mutually exclusive; the visitor is invoked exactly once
/// for `Success` and never otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseStatus {
    /// Message decoded, validated and dispatched
    Success,
    /// A dispatched-to-be block failed the proof-of-work check
    InsufficientWork,
    /// Buffer too short to hold a header
    InvalidHeader,
    /// Type byte names no dispatchable message
    InvalidMessageType,
    /// Keepalive payload malformed, truncated or over-long
    InvalidKeepaliveMessage,
    /// Publish payload malformed, truncated or over-long
    InvalidPublishMessage,
    /// Confirm-req payload malformed, truncated or over-long
    InvalidConfirmReqMessage,
    /// Confirm-ack payload malformed, truncated or over-long
    InvalidConfirmAckMessage,
    /// Handshake payload malformed, truncated or over-long
    InvalidNodeIdHandshakeMessage,
    /// Sender's protocol version is below this network's minimum
    OutdatedVersion,
    /// First magic byte is not the protocol signature
    InvalidMagic,
    /// Second magic byte names a different network
    InvalidNetwork,
    /// Buffer exceeds the safe single-datagram size; nothing was decoded
    MessageSizeTooBig,
}

impl ParseStatus {
    /// Stable snake_case name, for logs and peer scoring counters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InsufficientWork => "insufficient_work",
            Self::InvalidHeader => "invalid_header",
            Self::InvalidMessageType => "invalid_message_type",
            Self::InvalidKeepaliveMessage => "invalid_keepalive_message",
            Self::InvalidPublishMessage => "invalid_publish_message",
            Self::InvalidConfirmReqMessage => "invalid_confirm_req_message",
            Self::InvalidConfirmAckMessage => "invalid_confirm_ack_message",
            Self::InvalidNodeIdHandshakeMessage => "invalid_node_id_handshake_message",
            Self::OutdatedVersion => "outdated_version",
            Self::InvalidMagic => "invalid_magic",
            Self::InvalidNetwork => "invalid_network",
            Self::MessageSizeTooBig => "message_size_too_big",
        }
    }
}

impl std::fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parser for received datagrams.
///
/// Holds clones of the shared dedup caches and the shared work verifier;
/// everything else lives on the stack of each `parse` call.
pub struct MessageParser {
    network: Network,
    block_uniquer: BlockUniquer,
    vote_uniquer: VoteUniquer,
    work: Arc<dyn WorkVerifier>,
}

impl MessageParser {
    /// Largest buffer accepted without a `MessageSizeTooBig` rejection.
    pub const MAX_SAFE_MESSAGE_SIZE: usize = crate::network::MAX_SAFE_MESSAGE_SIZE;

    /// Build a parser for one network.
    #[must_use]
    pub fn new(
        network: Network,
        block_uniquer: BlockUniquer,
        vote_uniquer: VoteUniquer,
        work: Arc<dyn WorkVerifier>,
    ) -> Self {
        Self { network, block_uniquer, vote_uniquer, work }
    }

    /// Parse one buffer and dispatch it to the visitor on success.
    ///
    /// Only the five realtime message types are dispatched here; the
    /// bootstrap types arrive framed over their own TCP connections and
    /// fall through to `invalid_message_type` like any other
    /// non-dispatchable type byte.
    pub fn parse(&self, buffer: &[u8], visitor: &mut dyn MessageVisitor) -> ParseStatus {
        if buffer.len() > Self::MAX_SAFE_MESSAGE_SIZE {
            tracing::debug!(size = buffer.len(), "dropping oversized datagram");
            return ParseStatus::MessageSizeTooBig;
        }

        let header = match MessageHeader::from_bytes(buffer) {
            Ok(header) => *header,
            Err(error) => {
                tracing::debug!(%error, "rejected header");
                return ParseStatus::InvalidHeader;
            }
        };

        if header.version_using() < self.network.minimum_version() {
            tracing::debug!(
                version_using = header.version_using(),
                minimum = self.network.minimum_version(),
                "rejected outdated peer"
            );
            return ParseStatus::OutdatedVersion;
        }
        if !header.valid_magic() {
            return ParseStatus::InvalidMagic;
        }
        if !header.valid_network(self.network) {
            return ParseStatus::InvalidNetwork;
        }

        let mut reader = Reader::new(&buffer[MessageHeader::SIZE..]);
        match header.message_type() {
            Some(MessageType::Keepalive) => self.parse_keepalive(&mut reader, header, visitor),
            Some(MessageType::Publish) => self.parse_publish(&mut reader, header, visitor),
            Some(MessageType::ConfirmReq) => self.parse_confirm_req(&mut reader, header, visitor),
            Some(MessageType::ConfirmAck) => self.parse_confirm_ack(&mut reader, header, visitor),
            Some(MessageType::NodeIdHandshake) => {
                self.parse_node_id_handshake(&mut reader, header, visitor)
            }
            _ => {
                tracing::debug!(
                    message_type = header.message_type_raw(),
                    "rejected non-dispatchable message type"
                );
                ParseStatus::InvalidMessageType
            }
        }
    }

    fn parse_keepalive(
        &self,
        reader: &mut Reader<'_>,
        header: MessageHeader,
        visitor: &mut dyn MessageVisitor,
    ) -> ParseStatus {
        match Keepalive::decode(reader, header) {
            Ok(message) if reader.is_exhausted() => {
                visitor.keepalive(&message);
                ParseStatus::Success
            }
            outcome => {
                tracing::debug!(
                    error = ?outcome.err(),
                    remaining = reader.remaining(),
                    "rejected keepalive"
                );
                ParseStatus::InvalidKeepaliveMessage
            }
        }
    }

    fn parse_publish(
        &self,
        reader: &mut Reader<'_>,
        header: MessageHeader,
        visitor: &mut dyn MessageVisitor,
    ) -> ParseStatus {
        match Publish::decode(reader, header, Some(&self.block_uniquer)) {
            Ok(message) if reader.is_exhausted() => {
                if self.work.verify(&message.block) {
                    visitor.publish(&message);
                    ParseStatus::Success
                } else {
                    tracing::debug!(work = message.block.work(), "publish failed the work check");
                    ParseStatus::InsufficientWork
                }
            }
            outcome => {
                tracing::debug!(
                    error = ?outcome.err(),
                    remaining = reader.remaining(),
                    "rejected publish"
                );
                ParseStatus::InvalidPublishMessage
            }
        }
    }

    fn parse_confirm_req(
        &self,
        reader: &mut Reader<'_>,
        header: MessageHeader,
        visitor: &mut dyn MessageVisitor,
    ) -> ParseStatus {
        match ConfirmReq::decode(reader, header, Some(&self.block_uniquer)) {
            Ok(message) if reader.is_exhausted() => {
                if self.work.verify(&message.block) {
                    visitor.confirm_req(&message);
                    ParseStatus::Success
                } else {
                    tracing::debug!(
                        work = message.block.work(),
                        "confirm_req failed the work check"
                    );
                    ParseStatus::InsufficientWork
                }
            }
            outcome => {
                tracing::debug!(
                    error = ?outcome.err(),
                    remaining = reader.remaining(),
                    "rejected confirm_req"
                );
                ParseStatus::InvalidConfirmReqMessage
            }
        }
    }

    fn parse_confirm_ack(
        &self,
        reader: &mut Reader<'_>,
        header: MessageHeader,
        visitor: &mut dyn MessageVisitor,
    ) -> ParseStatus {
        match ConfirmAck::decode(reader, header, Some(&self.vote_uniquer)) {
            Ok(message) if reader.is_exhausted() => {
                // Hash-only entries carry no work to check
                for entry in message.vote.entries() {
                    if let VoteEntry::Block(block) = entry {
                        if !self.work.verify(block) {
                            tracing::debug!(
                                work = block.work(),
                                "vote block failed the work check"
                            );
                            return ParseStatus::InsufficientWork;
                        }
                    }
                }
                visitor.confirm_ack(&message);
                ParseStatus::Success
            }
            outcome => {
                tracing::debug!(
                    error = ?outcome.err(),
                    remaining = reader.remaining(),
                    "rejected confirm_ack"
                );
                ParseStatus::InvalidConfirmAckMessage
            }
        }
    }

    fn parse_node_id_handshake(
        &self,
        reader: &mut Reader<'_>,
        header: MessageHeader,
        visitor: &mut dyn MessageVisitor,
    ) -> ParseStatus {
        match NodeIdHandshake::decode(reader, header) {
            Ok(message) if reader.is_exhausted() => {
                visitor.node_id_handshake(&message);
                ParseStatus::Success
            }
            outcome => {
                tracing::debug!(
                    error = ?outcome.err(),
                    remaining = reader.remaining(),
                    "rejected node_id_handshake"
                );
                ParseStatus::InvalidNodeIdHandshakeMessage
            }
        }
    }
}
