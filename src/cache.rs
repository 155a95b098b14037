//! Lazy memoization of per-entity-pair correlation vectors.
//!
//! The circular correlation of a (subject, object) pair is independent of
//! the predicate being scored, so rule mining revisits the same pair many
//! times with different relations. Caching trades O(pairs · n) memory for
//! skipping the inverse transform on every revisit.
//!
//! Worst case the cache holds one vector per entity pair, so it is only
//! worth enabling on workspaces below [`CACHED_CORREL_THRESHOLD`] entities;
//! the HolE constructor applies that heuristic automatically.
//!
//! # Concurrency
//!
//! Scoring runs on many worker threads against one shared client. Cells
//! are published through striped read/write locks: the compute closure runs
//! outside the lock, the first publisher wins, and a racing duplicate is
//! discarded. Redundant computation is tolerated (the value is identical);
//! corruption is not.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::facts::encode_pair;

/// Auto-enable bound on the entity count.
///
/// Above this, the n² pair space makes dense caching a memory liability.
pub const CACHED_CORREL_THRESHOLD: usize = 15_000;

const SHARDS: usize = 64;

type Shard = RwLock<HashMap<u64, Arc<[f64]>>>;

/// Striped map from encoded (subject, object) pairs to correlation vectors.
///
/// Cells transition absent → computed at most once per pair (best effort
/// under races) and are never evicted.
#[derive(Debug)]
pub struct CorrelationCache {
    shards: Vec<Shard>,
}

impl CorrelationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            shards: (0..SHARDS).map(|_| RwLock::new(HashMap::new())).collect(),
        }
    }

    fn shard(&self, key: u64) -> &Shard {
        // Pair keys are dense low integers; mix before taking shard bits.
        let mixed = key.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        &self.shards[(mixed >> 58) as usize]
    }

    /// Return the cached correlation for (subject, object), computing and
    /// publishing it on first access.
    ///
    /// Under a concurrent first access the closure may run more than once,
    /// but every caller observes the vector that was published first.
    pub fn get_or_compute(
        &self,
        subject: usize,
        object: usize,
        compute: impl FnOnce() -> Vec<f64>,
    ) -> Arc<[f64]> {
        let key = encode_pair(subject, object);
        let shard = self.shard(key);

        if let Some(hit) = shard
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(hit);
        }

        let computed: Arc<[f64]> = compute().into();
        let mut guard = shard.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(guard.entry(key).or_insert(computed))
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    /// Whether no pair has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CorrelationCache {
    fn default() -> Self {
        Self::new()
    }
}
