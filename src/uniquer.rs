//! Dedup caches for repeatedly gossiped payloads.
//!
//! The network delivers the same block or vote many times over, once per
//! peer that relays it. The uniquers canonicalize structurally identical
//! payloads to a single shared allocation, keyed by content digest and
//! held weakly so the cache never keeps a payload alive on its own.
//!
//! Handles are cheap clones of a shared map and are safe to use from
//! many parsing threads at once. They are always passed in explicitly;
//! there is no process-wide singleton.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use crate::{block::Block, vote::Vote};

// Dead weak entries are swept once the table grows past this.
const PRUNE_THRESHOLD: usize = 1024;

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking holder cannot leave the map structurally invalid, so
    // poisoning is not treated as fatal.
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

macro_rules! uniquer {
    ($(#[$doc:meta])* $name:ident, $payload:ty) => {
        $(#[$doc])*
        #[derive(Clone, Default)]
        pub struct $name {
            inner: Arc<Mutex<HashMap<[u8; 32], Weak<$payload>>>>,
        }

        impl $name {
            /// Create an empty cache.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Return the canonical shared instance for this payload.
            ///
            /// The first caller's instance becomes canonical; later
            /// structurally identical payloads are dropped in favor of
            /// the cached one.
            #[must_use]
            pub fn unique(&self, payload: Arc<$payload>) -> Arc<$payload> {
                let key = payload.digest();
                let mut map = lock_unpoisoned(&self.inner);
                if let Some(existing) = map.get(&key).and_then(Weak::upgrade) {
                    return existing;
                }
                map.insert(key, Arc::downgrade(&payload));
                if map.len() > PRUNE_THRESHOLD {
                    map.retain(|_, weak| weak.strong_count() > 0);
                }
                payload
            }

            /// Number of tracked entries, live or not yet swept.
            #[must_use]
            pub fn len(&self) -> usize {
                lock_unpoisoned(&self.inner).len()
            }

            /// True when no entries are tracked.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }
    };
}

uniquer!(
    /// Canonicalizing cache for decoded blocks.
    BlockUniquer,
    Block
);

uniquer!(
    /// Canonicalizing cache for decoded votes.
    VoteUniquer,
    Vote
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, ChangeBlock};

    fn change_block(work: u64) -> Arc<Block> {
        Arc::new(Block::Change(ChangeBlock {
            previous: [1u8; 32],
            representative: [2u8; 32],
            signature: [3u8; 64],
            work,
        }))
    }

    #[test]
    fn identical_blocks_share_one_allocation() {
        let uniquer = BlockUniquer::new();
        let first = uniquer.unique(change_block(7));
        let second = uniquer.unique(change_block(7));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(uniquer.len(), 1);
    }

    #[test]
    fn different_blocks_stay_distinct() {
        let uniquer = BlockUniquer::new();
        let first = uniquer.unique(change_block(1));
        let second = uniquer.unique(change_block(2));
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(uniquer.len(), 2);
    }

    #[test]
    fn dropped_payloads_are_replaced() {
        let uniquer = BlockUniquer::new();
        let first = uniquer.unique(change_block(7));
        drop(first);
        // The weak entry is dead, so a new instance becomes canonical.
        let second = uniquer.unique(change_block(7));
        assert_eq!(*second, *change_block(7));
        assert_eq!(uniquer.len(), 1);
    }

    #[test]
    fn clones_share_the_map() {
        let uniquer = BlockUniquer::new();
        let handle = uniquer.clone();
        let first = uniquer.unique(change_block(7));
        let second = handle.unique(change_block(7));
        assert!(Arc::ptr_eq(&first, &second));
    }
}
