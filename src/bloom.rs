//! Standard Bloom filter implementation
//!
//! A fixed-capacity, insert-only bit array indexed by the hash functions in
//! [`crate::hash::HASH_FUNCTIONS`].

use crate::hash::{self, NUM_HASH_FUNCTIONS};
use crate::storage::{PackedSlots, SlotStorage};
use crate::{utils, Result};

/// Outcome of a membership query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The key was definitely never added.
    ///
    /// `hash_index` is the first hash function whose slot was unset and `slot`
    /// is the slot it mapped to. Both are diagnostics only.
    Absent { hash_index: usize, slot: usize },
    /// Every slot for the key is set. The key may have been added, or this
    /// may be a false positive.
    PossiblyPresent,
}

impl Verdict {
    pub fn is_present(&self) -> bool {
        matches!(self, Verdict::PossiblyPresent)
    }
}

/// A standard Bloom filter
///
/// The storage strategy is a type parameter; see [`crate::storage`].
#[derive(Debug, Clone)]
pub struct BloomFilter<S: SlotStorage = PackedSlots> {
    /// Slot storage, never resized and never cleared
    bits: S,
    /// Number of `add` calls (for statistics)
    count: usize,
}

impl BloomFilter<PackedSlots> {
    /// Create a new Bloom filter with `capacity` bit-packed slots
    ///
    /// Returns [`crate::BloomError::Configuration`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_storage(capacity)
    }
}

impl<S: SlotStorage> BloomFilter<S> {
    /// Create a Bloom filter with a specific storage strategy
    pub fn with_storage(capacity: usize) -> Result<Self> {
        hash::check_capacity(capacity)?;

        tracing::debug!(
            capacity,
            hashes = ?hash::hash_function_names(),
            storage = S::NAME,
            "created bloom filter"
        );

        Ok(BloomFilter {
            bits: S::with_len(capacity),
            count: 0,
        })
    }

    /// Insert a key into the filter
    pub fn add(&mut self, key: &[u8]) {
        let capacity = self.bits.len();
        for slot in hash::slot_indices(key, capacity) {
            self.bits.set(slot);
        }

        self.count += 1;
    }

    /// Check a key against the filter
    ///
    /// Hash functions are evaluated in order and the query stops at the first
    /// unset slot.
    pub fn query(&self, key: &[u8]) -> Verdict {
        let capacity = self.bits.len();
        for (hash_index, slot) in hash::slot_indices(key, capacity).enumerate() {
            if !self.bits.get(slot) {
                return Verdict::Absent { hash_index, slot };
            }
        }

        Verdict::PossiblyPresent
    }

    /// Check if a key might be in the filter
    /// Returns true if the key might be present (with possible false positives)
    /// Returns false if the key is definitely not present
    pub fn contains(&self, key: &[u8]) -> bool {
        self.query(key).is_present()
    }

    /// Number of set slots
    pub fn set_bits(&self) -> usize {
        self.bits.count_set()
    }

    /// Indices of the set slots, ascending
    pub fn set_bit_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.set_indices()
    }

    /// Get the current load factor (fraction of bits set)
    pub fn load_factor(&self) -> f64 {
        self.set_bits() as f64 / self.bits.len() as f64
    }

    /// Get the estimated false positive rate from the current load factor
    pub fn estimated_fpr(&self) -> f64 {
        self.load_factor().powi(NUM_HASH_FUNCTIONS as i32)
    }

    /// False positive rate predicted by `(1 - e^(-kn/m))^k` for the keys added so far
    pub fn theoretical_fpr(&self) -> f64 {
        utils::theoretical_fpr(self.bits.len(), self.count, NUM_HASH_FUNCTIONS)
    }

    /// Get statistics about the filter
    pub fn stats(&self) -> BloomStats {
        BloomStats {
            capacity: self.bits.len(),
            num_hash_functions: NUM_HASH_FUNCTIONS,
            hash_functions: hash::hash_function_names(),
            storage: S::NAME,
            elements_inserted: self.count,
            load_factor: self.load_factor(),
            estimated_fpr: self.estimated_fpr(),
            theoretical_fpr: self.theoretical_fpr(),
        }
    }

    /// Get the number of `add` calls, duplicates included
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if nothing has been added yet
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the capacity (number of slots)
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of hash functions
    pub fn num_hash_functions(&self) -> usize {
        NUM_HASH_FUNCTIONS
    }
}

/// Statistics about a Bloom filter
#[derive(Debug, Clone)]
pub struct BloomStats {
    pub capacity: usize,
    pub num_hash_functions: usize,
    pub hash_functions: Vec<String>,
    pub storage: &'static str,
    pub elements_inserted: usize,
    pub load_factor: f64,
    pub estimated_fpr: f64,
    pub theoretical_fpr: f64,
}

impl std::fmt::Display for BloomStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter Stats:\n\
             - Capacity: {} slots ({})\n\
             - Hash functions: {} ({})\n\
             - Elements inserted: {}\n\
             - Load factor: {:.3}\n\
             - Estimated FPR: {:.6}\n\
             - Theoretical FPR: {:.6}",
            self.capacity,
            self.storage,
            self.num_hash_functions,
            self.hash_functions.join(", "),
            self.elements_inserted,
            self.load_factor,
            self.estimated_fpr,
            self.theoretical_fpr
        )
    }
}
