//! Network identity and protocol version constants.

/// Current protocol version, advertised as `version_max` and
/// `version_using` on outgoing messages.
pub const PROTOCOL_VERSION: u8 = 15;

/// Oldest protocol version this node still talks to.
pub const PROTOCOL_VERSION_MIN: u8 = 12;

/// Stricter lower bound applied on the beta network, where old peers are
/// retired aggressively between releases.
pub const PROTOCOL_VERSION_REASONABLE_MIN: u8 = 14;

/// MTU - IP header - UDP header: the largest buffer guaranteed to have
/// arrived as a single undamaged datagram.
pub const MAX_SAFE_MESSAGE_SIZE: usize = 508;

/// Which Cinder network a node participates in.
///
/// The network is baked into the second magic byte of every message
/// header, so messages from one network are rejected by the others
/// before any payload decoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Local test network
    Test,
    /// Public beta network
    Beta,
    /// Production network
    Live,
}

impl Network {
    /// Wire identifier carried in `magic[1]`
    #[must_use]
    pub const fn id_byte(self) -> u8 {
        match self {
            Self::Test => b'A',
            Self::Beta => b'B',
            Self::Live => b'C',
        }
    }

    /// Minimum `version_using` accepted from a peer on this network
    #[must_use]
    pub const fn minimum_version(self) -> u8 {
        match self {
            Self::Beta => PROTOCOL_VERSION_REASONABLE_MIN,
            Self::Test | Self::Live => PROTOCOL_VERSION_MIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_bytes_distinct() {
        assert_ne!(Network::Test.id_byte(), Network::Beta.id_byte());
        assert_ne!(Network::Beta.id_byte(), Network::Live.id_byte());
    }

    #[test]
    fn beta_is_stricter() {
        assert!(Network::Beta.minimum_version() > Network::Live.minimum_version());
        assert_eq!(Network::Live.minimum_version(), PROTOCOL_VERSION_MIN);
    }
}
