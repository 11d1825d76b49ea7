//! End-to-end tests through the datagram parser.
//!
//! These tests drive real encoded buffers through `MessageParser` and a
//! recording visitor to verify the full receive path:
//! - Encoded realtime messages come back out payload-equal
//! - Deduplication shares one block across datagrams from many peers
//! - Bootstrap messages are framed by the header's payload length
//! - Arbitrary garbage never panics and never reaches the visitor

use std::sync::Arc;

use cinder_proto::{
    parse_endpoint, Block, BlockUniquer, ConfirmAck, ConfirmReq, Keepalive, Message, MessageHeader,
    MessageParser, MessageType, MessageVisitor, Network, NodeIdHandshake, ParseStatus, Publish,
    StateBlock, ThresholdWork, Vote, VoteEntry, VoteUniquer, WorkVerifier,
};

/// Visitor that keeps every dispatched message.
#[derive(Default)]
struct Recorder {
    messages: Vec<Message>,
}

impl MessageVisitor for Recorder {
    fn keepalive(&mut self, message: &Keepalive) {
        self.messages.push(Message::Keepalive(message.clone()));
    }
    fn publish(&mut self, message: &Publish) {
        self.messages.push(Message::Publish(message.clone()));
    }
    fn confirm_req(&mut self, message: &ConfirmReq) {
        self.messages.push(Message::ConfirmReq(message.clone()));
    }
    fn confirm_ack(&mut self, message: &ConfirmAck) {
        self.messages.push(Message::ConfirmAck(message.clone()));
    }
    fn node_id_handshake(&mut self, message: &NodeIdHandshake) {
        self.messages.push(Message::NodeIdHandshake(message.clone()));
    }
}

struct AcceptAll;
impl WorkVerifier for AcceptAll {
    fn verify(&self, _block: &Block) -> bool {
        true
    }
}

fn live_parser() -> MessageParser {
    MessageParser::new(Network::Live, BlockUniquer::new(), VoteUniquer::new(), Arc::new(AcceptAll))
}

fn encode(message: &Message) -> Vec<u8> {
    let mut wire = Vec::new();
    message.encode(&mut wire);
    wire
}

fn state_block(work: u64) -> Arc<Block> {
    Arc::new(Block::State(StateBlock {
        account: [0x11; 32],
        previous: [0x22; 32],
        representative: [0x33; 32],
        balance: [0x44; 16],
        link: [0x55; 32],
        signature: [0x66; 64],
        work,
    }))
}

#[test]
fn realtime_round_trips_through_parser() {
    let mut keepalive = Keepalive::new(Network::Live);
    keepalive.peers[0] = parse_endpoint("::ffff:192.168.1.1:7075").unwrap();
    keepalive.peers[3] = parse_endpoint("2001:db8::1:54000").unwrap();

    let vote = Arc::new(
        Vote::new(
            [0x77; 32],
            [0x88; 64],
            9000,
            vec![VoteEntry::Block(state_block(1)), VoteEntry::Hash([0x99; 32])],
        )
        .unwrap(),
    );

    let originals = [
        Message::Keepalive(keepalive),
        Message::Publish(Publish::new(Network::Live, state_block(2))),
        Message::ConfirmReq(ConfirmReq::new(Network::Live, state_block(3))),
        Message::ConfirmAck(ConfirmAck::new(Network::Live, vote)),
        Message::NodeIdHandshake(NodeIdHandshake::new(
            Network::Live,
            Some([0xAA; 32]),
            Some(([0xBB; 32], [0xCC; 64])),
        )),
    ];

    let parser = live_parser();
    for original in &originals {
        let mut visitor = Recorder::default();
        let status = parser.parse(&encode(original), &mut visitor);
        assert_eq!(status, ParseStatus::Success, "failed on {original:?}");
        assert_eq!(visitor.messages.len(), 1);
        assert_eq!(&visitor.messages[0], original);
    }
}

#[test]
fn identical_blocks_from_different_peers_share_memory() {
    let parser = live_parser();
    let wire = encode(&Message::Publish(Publish::new(Network::Live, state_block(42))));

    let mut first = Recorder::default();
    let mut second = Recorder::default();
    assert_eq!(parser.parse(&wire, &mut first), ParseStatus::Success);
    assert_eq!(parser.parse(&wire, &mut second), ParseStatus::Success);

    let (Message::Publish(a), Message::Publish(b)) = (&first.messages[0], &second.messages[0])
    else {
        panic!("expected publish dispatches");
    };
    assert!(Arc::ptr_eq(&a.block, &b.block));
}

#[test]
fn threshold_work_gates_dispatch() {
    // Threshold zero accepts any nonce; threshold max rejects all but a
    // vanishingly unlikely one.
    let lenient = MessageParser::new(
        Network::Live,
        BlockUniquer::new(),
        VoteUniquer::new(),
        Arc::new(ThresholdWork::new(0)),
    );
    let strict = MessageParser::new(
        Network::Live,
        BlockUniquer::new(),
        VoteUniquer::new(),
        Arc::new(ThresholdWork::new(u64::MAX)),
    );
    let wire = encode(&Message::Publish(Publish::new(Network::Live, state_block(12345))));

    let mut visitor = Recorder::default();
    assert_eq!(lenient.parse(&wire, &mut visitor), ParseStatus::Success);
    assert_eq!(visitor.messages.len(), 1);

    let mut visitor = Recorder::default();
    assert_eq!(strict.parse(&wire, &mut visitor), ParseStatus::InsufficientWork);
    assert!(visitor.messages.is_empty());
}

#[test]
fn bootstrap_messages_rejected_by_datagram_parser() {
    let parser = live_parser();
    for message_type in [
        MessageType::FrontierReq,
        MessageType::BulkPull,
        MessageType::BulkPullAccount,
        MessageType::BulkPush,
    ] {
        // Header alone; the parser must refuse before touching the payload
        let header = MessageHeader::new(Network::Live, message_type);
        let mut visitor = Recorder::default();
        let status = parser.parse(&header.to_bytes(), &mut visitor);
        assert_eq!(status, ParseStatus::InvalidMessageType, "dispatched {message_type:?}");
        assert!(visitor.messages.is_empty());
    }
}

#[test]
fn bootstrap_framing_by_header() {
    // A bootstrap connection reads 8 header bytes, asks the header how
    // many payload bytes follow, then decodes exactly that many.
    let original = cinder_proto::BulkPull::new(Network::Live, [0x01; 32], [0x02; 32], 700);
    let wire = encode(&Message::BulkPull(original.clone()));

    let header = *MessageHeader::from_bytes(&wire[..MessageHeader::SIZE]).unwrap();
    let payload_length = header.payload_length_bytes().unwrap();
    assert_eq!(wire.len(), MessageHeader::SIZE + payload_length);

    let mut reader = cinder_proto::wire::Reader::new(&wire[MessageHeader::SIZE..]);
    let decoded = cinder_proto::BulkPull::decode(&mut reader, header).unwrap();
    assert!(reader.is_exhausted());
    assert_eq!(decoded, original);
    assert_eq!(decoded.count, 700);
}

#[test]
fn each_header_gate_yields_its_own_status() {
    let parser = live_parser();
    let keepalive = encode(&Message::Keepalive(Keepalive::new(Network::Live)));

    // (byte position, corrupted value, expected status)
    let corruptions = [
        (0, b'X', ParseStatus::InvalidMagic),
        (1, b'B', ParseStatus::InvalidNetwork),
        (3, 0u8, ParseStatus::OutdatedVersion),
        (5, 0xFFu8, ParseStatus::InvalidMessageType),
        (5, 0x00u8, ParseStatus::InvalidMessageType), // reserved wire value
    ];

    for (position, value, expected) in corruptions {
        let mut wire = keepalive.clone();
        wire[position] = value;
        let mut visitor = Recorder::default();
        let status = parser.parse(&wire, &mut visitor);
        assert_eq!(status, expected, "byte {position} set to {value:#04x}");
        assert!(visitor.messages.is_empty());
    }

    // A truncated payload is a keepalive problem, a truncated header is not
    let mut visitor = Recorder::default();
    assert_eq!(
        parser.parse(&keepalive[..keepalive.len() - 1], &mut visitor),
        ParseStatus::InvalidKeepaliveMessage
    );
    assert_eq!(
        parser.parse(&keepalive[..MessageHeader::SIZE - 1], &mut visitor),
        ParseStatus::InvalidHeader
    );
    assert!(visitor.messages.is_empty());
}

#[test]
fn garbage_buffers_never_panic() {
    let parser = live_parser();
    // Deterministic xorshift noise across a spread of sizes
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    for size in [0, 1, 7, 8, 9, 63, 144, 507, 508, 509, 4096] {
        let buffer: Vec<u8> = (0..size)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state as u8
            })
            .collect();
        let mut visitor = Recorder::default();
        let status = parser.parse(&buffer, &mut visitor);
        if status != ParseStatus::Success {
            assert!(visitor.messages.is_empty());
        }
    }
}

#[test]
fn version_negotiation_survives_the_round_trip() {
    let parser = live_parser();
    let mut message = Keepalive::new(Network::Live);
    message.header.set_version_using(cinder_proto::PROTOCOL_VERSION_MIN);

    let mut visitor = Recorder::default();
    let status = parser.parse(&encode(&Message::Keepalive(message)), &mut visitor);
    assert_eq!(status, ParseStatus::Success);
    let received = visitor.messages[0].header();
    assert_eq!(received.version_using(), cinder_proto::PROTOCOL_VERSION_MIN);
    assert_eq!(received.version_max(), cinder_proto::PROTOCOL_VERSION);
}
