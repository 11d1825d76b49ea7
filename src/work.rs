//! Proof-of-work validation seam.
//!
//! The parser spot-checks the work nonce on every block it is about to
//! dispatch, as network-level spam resistance ahead of full ledger
//! validation. The actual check lives behind [`WorkVerifier`] so the
//! wire layer never depends on the work pool's internals, and tests can
//! substitute a fixed verdict.

use crate::block::Block;

/// Judges whether a block's embedded work nonce meets the difficulty
/// threshold for its root.
///
/// Implementations must be safe to call from many parsing threads at
/// once; the parser shares one verifier across all connections.
pub trait WorkVerifier: Send + Sync {
    /// True when the block's work value is acceptable.
    fn verify(&self, block: &Block) -> bool;
}

/// Difficulty-threshold verifier.
///
/// Hashes the work nonce against the block's root and accepts when the
/// leading 8 bytes, read little-endian, clear the threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdWork {
    threshold: u64,
}

impl ThresholdWork {
    /// Production difficulty threshold.
    pub const DEFAULT_THRESHOLD: u64 = 0xFFFF_FFC0_0000_0000;

    /// Verifier with an explicit threshold (lowered for test networks).
    #[must_use]
    pub const fn new(threshold: u64) -> Self {
        Self { threshold }
    }
}

impl Default for ThresholdWork {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl WorkVerifier for ThresholdWork {
    fn verify(&self, block: &Block) -> bool {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&block.work().to_le_bytes());
        hasher.update(&block.root());
        let digest = hasher.finalize();

        let mut leading = [0u8; 8];
        leading.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(leading) >= self.threshold
    }
}
