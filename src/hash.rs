//! Hash functions for Bloom filters
//!
//! Slot indices come from a fixed, ordered set of seeded MurmurHash3 (x86, 32-bit)
//! functions. Every call hashes the key from a fresh reader, so no hashing state
//! survives between calls.

use std::io::Cursor;

use crate::{BloomError, Result};

/// Trait for hash functions used in Bloom filters
pub trait HashFunction: Send + Sync {
    /// Hash a key to an unsigned 32-bit value
    fn hash(&self, key: &[u8]) -> u32;

    /// Get a name/identifier for this hash function
    fn name(&self) -> String;
}

/// MurmurHash3_x86_32 with a fixed seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Murmur3Hash {
    seed: u32,
}

impl Murmur3Hash {
    pub const fn with_seed(seed: u32) -> Self {
        Murmur3Hash { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl HashFunction for Murmur3Hash {
    fn hash(&self, key: &[u8]) -> u32 {
        // Reading from an in-memory slice cannot fail.
        murmur3::murmur3_32(&mut Cursor::new(key), self.seed).unwrap_or_default()
    }

    fn name(&self) -> String {
        format!("murmur3_32-seed{}", self.seed)
    }
}

/// Number of hash functions applied per key (k)
pub const NUM_HASH_FUNCTIONS: usize = 2;

/// The process-wide hash function set, in evaluation order
pub static HASH_FUNCTIONS: [Murmur3Hash; NUM_HASH_FUNCTIONS] =
    [Murmur3Hash::with_seed(10), Murmur3Hash::with_seed(20000)];

/// Map a key to a slot in `[0, capacity)` using hash function `function_index`
///
/// Fails with [`BloomError::Configuration`] when `capacity` is zero or
/// `function_index` is not below [`NUM_HASH_FUNCTIONS`].
pub fn index(function_index: usize, key: &[u8], capacity: usize) -> Result<usize> {
    check_capacity(capacity)?;
    let hash_fn = HASH_FUNCTIONS.get(function_index).ok_or_else(|| {
        BloomError::Configuration(format!(
            "Hash function index {} out of range 0..{}",
            function_index, NUM_HASH_FUNCTIONS
        ))
    })?;

    Ok(reduce(hash_fn.hash(key), capacity))
}

/// Reject a zero slot count, which would make the modulo undefined
pub(crate) fn check_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        tracing::debug!("rejecting zero capacity");
        return Err(BloomError::Configuration(
            "Capacity must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Names of the hash functions, in evaluation order
pub fn hash_function_names() -> Vec<String> {
    HASH_FUNCTIONS.iter().map(|f| f.name()).collect()
}

/// Slot indices of `key` for every hash function, in order.
///
/// `capacity` must be non-zero; the filters check this once at construction.
pub(crate) fn slot_indices(key: &[u8], capacity: usize) -> impl Iterator<Item = usize> + '_ {
    debug_assert!(capacity > 0);
    HASH_FUNCTIONS
        .iter()
        .map(move |hash_fn| reduce(hash_fn.hash(key), capacity))
}

#[inline]
fn reduce(hash: u32, capacity: usize) -> usize {
    (u64::from(hash) % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur3_reference_vectors() {
        assert_eq!(Murmur3Hash::with_seed(0).hash(b""), 0);
        assert_eq!(Murmur3Hash::with_seed(1).hash(b""), 0x514E_28B7);
        assert_eq!(Murmur3Hash::with_seed(0xFFFF_FFFF).hash(b""), 0x81F1_6F39);
    }

    #[test]
    fn test_fixed_seed_vectors() {
        let [seed10, seed20000] = &HASH_FUNCTIONS;

        assert_eq!(seed10.hash(b""), 3_911_517_328);
        assert_eq!(seed20000.hash(b""), 3_557_571_671);
        assert_eq!(seed10.hash(b"abc"), 949_467_219);
        assert_eq!(seed20000.hash(b"abc"), 3_385_082_727);
        assert_eq!(seed10.hash(b"hello"), 3_967_945_218);
        assert_eq!(seed20000.hash(b"hello"), 3_561_185_928);
    }

    #[test]
    fn test_index_fixed_values() {
        assert_eq!(index(0, b"hello", 1000).unwrap(), 218);
        assert_eq!(index(1, b"hello", 1000).unwrap(), 928);
        assert_eq!(index(0, b"abc", 1000).unwrap(), 219);
        assert_eq!(index(1, b"abc", 1000).unwrap(), 727);
    }

    #[test]
    fn test_check_capacity() {
        assert!(check_capacity(1).is_ok());
        assert_eq!(
            check_capacity(0),
            Err(BloomError::Configuration("Capacity must be > 0".to_string()))
        );
    }

    #[test]
    fn test_hash_is_stateless() {
        let hasher = &HASH_FUNCTIONS[0];
        let first = hasher.hash(b"alpha");

        // Hashing other keys in between must not change the result
        hasher.hash(b"beta");
        hasher.hash(b"a much longer key that spans several murmur blocks");
        assert_eq!(hasher.hash(b"alpha"), first);
    }

    #[test]
    fn test_index_in_range() {
        for capacity in [1usize, 2, 7, 1000, 9_999] {
            for function_index in 0..NUM_HASH_FUNCTIONS {
                let idx = index(function_index, b"some-key", capacity).unwrap();
                assert!(idx < capacity);
            }
        }
        assert_eq!(index(0, b"anything", 1).unwrap(), 0);
    }

    #[test]
    fn test_index_matches_hash_mod_capacity() {
        let key = b"0b3c8c7e-7e43-4d1a-9a3c-3f0f4a1b2c3d";
        let expected = HASH_FUNCTIONS[1].hash(key) as usize % 1000;
        assert_eq!(index(1, key, 1000).unwrap(), expected);
    }

    #[test]
    fn test_index_rejects_zero_capacity() {
        assert!(matches!(
            index(0, b"key", 0),
            Err(BloomError::Configuration(_))
        ));
    }

    #[test]
    fn test_index_rejects_unknown_function() {
        assert!(matches!(
            index(NUM_HASH_FUNCTIONS, b"key", 100),
            Err(BloomError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_key() {
        let idx = index(0, b"", 100).unwrap();
        assert_eq!(idx, index(0, b"", 100).unwrap());
        assert!(idx < 100);
    }

    #[test]
    fn test_hash_function_diversity() {
        let seeds: Vec<u32> = HASH_FUNCTIONS.iter().map(|f| f.seed()).collect();
        assert_eq!(seeds, vec![10, 20000]);

        // Different seeds should disagree on most keys
        let differing = (0..100u32)
            .map(|i| i.to_le_bytes())
            .filter(|key| HASH_FUNCTIONS[0].hash(key) != HASH_FUNCTIONS[1].hash(key))
            .count();
        assert!(differing > 90);
    }

    #[test]
    fn test_slot_indices_follow_function_order() {
        let key = b"ordered";
        let slots: Vec<usize> = slot_indices(key, 4096).collect();
        assert_eq!(slots.len(), NUM_HASH_FUNCTIONS);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(*slot, index(i, key, 4096).unwrap());
        }
        assert_eq!(
            hash_function_names(),
            vec!["murmur3_32-seed10", "murmur3_32-seed20000"]
        );
    }
}
