//! Node identity handshake.

use bytes::BufMut;

use crate::{
    errors::Result,
    flags::HandshakeFlags,
    header::MessageHeader,
    network::Network,
    types::{Account, MessageType, Signature},
    wire::Reader,
};

/// Node identity handshake, proving control of a node id key.
///
/// Both halves are optional and announced by the header's query and
/// response bits: a peer opens with a query cookie, the other side
/// answers with its node account and a signature over the cookie, and a
/// single message may carry both when handshakes cross. An absent half
/// contributes zero bytes to the stream; the bits are the only framing.
#[derive(Debug, Clone)]
pub struct NodeIdHandshake {
    /// Message header, query/response bits matching the fields
    pub header: MessageHeader,
    /// Random cookie the peer is asked to sign
    pub query: Option<[u8; 32]>,
    /// Node account and its signature over our cookie
    pub response: Option<(Account, Signature)>,
}

impl NodeIdHandshake {
    /// Build a handshake; either half may be omitted.
    #[must_use]
    pub fn new(
        network: Network,
        query: Option<[u8; 32]>,
        response: Option<(Account, Signature)>,
    ) -> Self {
        let mut header = MessageHeader::new(network, MessageType::NodeIdHandshake);
        let mut flags = HandshakeFlags::empty();
        flags.set(HandshakeFlags::QUERY, query.is_some());
        flags.set(HandshakeFlags::RESPONSE, response.is_some());
        header.set_extensions(header.extensions() | flags.bits());
        Self { header, query, response }
    }

    /// Decode the payload following an already-parsed header, reading
    /// exactly the fields its bits announce.
    pub fn decode(reader: &mut Reader<'_>, header: MessageHeader) -> Result<Self> {
        debug_assert_eq!(header.message_type(), Some(MessageType::NodeIdHandshake));
        let flags = HandshakeFlags::from_extensions(header.extensions());

        let query = if flags.contains(HandshakeFlags::QUERY) {
            Some(reader.read_array()?)
        } else {
            None
        };
        let response = if flags.contains(HandshakeFlags::RESPONSE) {
            let account = reader.read_array()?;
            let signature = reader.read_array()?;
            Some((account, signature))
        } else {
            None
        };

        Ok(Self { header, query, response })
    }

    /// Serialize header and whichever fields are present.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        if let Some(query) = &self.query {
            dst.put_slice(query);
        }
        if let Some((account, signature)) = &self.response {
            dst.put_slice(account);
            dst.put_slice(signature);
        }
    }
}

impl PartialEq for NodeIdHandshake {
    fn eq(&self, other: &Self) -> bool {
        self.query == other.query && self.response == other.response
    }
}

impl Eq for NodeIdHandshake {}
