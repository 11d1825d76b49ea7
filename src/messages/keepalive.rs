//! Peer liveness and address gossip.

use std::net::{Ipv6Addr, SocketAddrV6};

use bytes::BufMut;

use crate::{
    endpoint::Endpoint,
    errors::Result,
    header::MessageHeader,
    network::Network,
    types::MessageType,
    wire::Reader,
};

/// Keepalive message carrying exactly eight peer endpoints.
///
/// The peer list is a fixed-size sample of the sender's known peers.
/// Slots without a peer hold the unspecified endpoint `[::]:0`; the
/// payload is always 144 bytes, short reads reject the message.
#[derive(Debug, Clone)]
pub struct Keepalive {
    /// Message header
    pub header: MessageHeader,
    /// Advertised peers, padded with unspecified endpoints
    pub peers: [Endpoint; Self::PEER_COUNT],
}

impl Keepalive {
    /// Number of endpoint slots in every keepalive
    pub const PEER_COUNT: usize = 8;

    /// Payload size: 8 x (16-byte address + 2-byte port)
    pub const SIZE: usize = Self::PEER_COUNT * 18;

    fn unspecified() -> Endpoint {
        SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, 0, 0, 0)
    }

    /// Keepalive with an empty peer list.
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            header: MessageHeader::new(network, MessageType::Keepalive),
            peers: [Self::unspecified(); Self::PEER_COUNT],
        }
    }

    /// Decode the peer list following an already-parsed header.
    pub fn decode(reader: &mut Reader<'_>, header: MessageHeader) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::Keepalive));
        let mut peers = [Self::unspecified(); Self::PEER_COUNT];
        for peer in &mut peers {
            let address: [u8; 16] = reader.read_array()?;
            let port = reader.read_u16_le()?;
            *peer = SocketAddrV6::new(Ipv6Addr::from(address), port, 0, 0);
        }
        Ok(Self { header, peers })
    }

    /// Serialize header and peer list.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        for peer in &self.peers {
            dst.put_slice(&peer.ip().octets());
            dst.put_u16_le(peer.port());
        }
    }
}

// Messages compare by payload; two equal peer lists may arrive under
// different version bytes.
impl PartialEq for Keepalive {
    fn eq(&self, other: &Self) -> bool {
        self.peers == other.peers
    }
}

impl Eq for Keepalive {}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    pub(crate) fn arbitrary_peers() -> impl Strategy<Value = [Endpoint; Keepalive::PEER_COUNT]> {
        prop::collection::vec((any::<u128>(), any::<u16>()), Keepalive::PEER_COUNT).prop_map(
            |list| {
                let mut peers = [Keepalive::unspecified(); Keepalive::PEER_COUNT];
                for (peer, (address, port)) in peers.iter_mut().zip(list) {
                    *peer = SocketAddrV6::new(Ipv6Addr::from(address), port, 0, 0);
                }
                peers
            },
        )
    }

    impl Arbitrary for Keepalive {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            arbitrary_peers()
                .prop_map(|peers| {
                    let mut message = Keepalive::new(Network::Live);
                    message.peers = peers;
                    message
                })
                .boxed()
        }
    }

    proptest! {
        #[test]
        fn keepalive_round_trip(message in any::<Keepalive>()) {
            let mut wire = Vec::new();
            message.encode(&mut wire);
            prop_assert_eq!(wire.len(), MessageHeader::SIZE + Keepalive::SIZE);

            let header = *MessageHeader::from_bytes(&wire).unwrap();
            let mut reader = Reader::new(&wire[MessageHeader::SIZE..]);
            let parsed = Keepalive::decode(&mut reader, header).expect("should decode");
            prop_assert!(reader.is_exhausted());
            prop_assert_eq!(message, parsed);
        }
    }

    #[test]
    fn payload_is_144_bytes() {
        assert_eq!(Keepalive::SIZE, 144);
    }

    #[test]
    fn short_peer_list_rejected() {
        let message = Keepalive::new(Network::Live);
        let mut wire = Vec::new();
        message.encode(&mut wire);
        wire.pop();

        let header = *MessageHeader::from_bytes(&wire).unwrap();
        let mut reader = Reader::new(&wire[MessageHeader::SIZE..]);
        assert!(Keepalive::decode(&mut reader, header).is_err());
    }

    #[test]
    fn default_peers_are_unspecified() {
        let message = Keepalive::new(Network::Test);
        for peer in &message.peers {
            assert!(peer.ip().is_unspecified());
            assert_eq!(peer.port(), 0);
        }
    }
}
