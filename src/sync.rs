//! Thread-safe Bloom filter
//!
//! Slots live in `AtomicU64` words and are set with `fetch_or`, so `add` and
//! `query` both take `&self`. Bits are never cleared, which means a query
//! racing an add can only miss the key being added, never read a torn state.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::bloom::Verdict;
use crate::hash;
use crate::Result;

const WORD_BITS: usize = 64;

/// A Bloom filter that can be shared across threads
#[derive(Debug)]
pub struct ConcurrentBloomFilter {
    words: Box<[AtomicU64]>,
    capacity: usize,
    count: AtomicUsize,
}

impl ConcurrentBloomFilter {
    /// Create a new filter with `capacity` slots
    pub fn new(capacity: usize) -> Result<Self> {
        hash::check_capacity(capacity)?;

        let num_words = capacity.div_ceil(WORD_BITS);
        let words = (0..num_words).map(|_| AtomicU64::new(0)).collect();

        tracing::debug!(
            capacity,
            hashes = ?hash::hash_function_names(),
            storage = "atomic",
            "created bloom filter"
        );

        Ok(ConcurrentBloomFilter {
            words,
            capacity,
            count: AtomicUsize::new(0),
        })
    }

    #[inline]
    fn locate(slot: usize) -> (usize, u64) {
        (slot / WORD_BITS, 1u64 << (slot % WORD_BITS))
    }

    /// Insert a key into the filter
    pub fn add(&self, key: &[u8]) {
        for slot in hash::slot_indices(key, self.capacity) {
            let (word, mask) = Self::locate(slot);
            self.words[word].fetch_or(mask, Ordering::Release);
        }

        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Check a key against the filter, stopping at the first unset slot
    pub fn query(&self, key: &[u8]) -> Verdict {
        for (hash_index, slot) in hash::slot_indices(key, self.capacity).enumerate() {
            let (word, mask) = Self::locate(slot);
            if self.words[word].load(Ordering::Acquire) & mask == 0 {
                return Verdict::Absent { hash_index, slot };
            }
        }

        Verdict::PossiblyPresent
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.query(key).is_present()
    }

    /// Number of set slots
    pub fn set_bits(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    pub fn load_factor(&self) -> f64 {
        self.set_bits() as f64 / self.capacity as f64
    }

    /// Number of `add` calls, duplicates included
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BloomError, BloomFilter};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_basic() {
        let filter = ConcurrentBloomFilter::new(1000).unwrap();
        assert!(!filter.contains(b"x"));

        filter.add(b"x");
        assert!(filter.contains(b"x"));
        assert_eq!(filter.len(), 1);
        assert!(filter.set_bits() >= 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            ConcurrentBloomFilter::new(0),
            Err(BloomError::Configuration(_))
        ));
    }

    #[test]
    fn test_matches_single_threaded_filter() {
        let concurrent = ConcurrentBloomFilter::new(777).unwrap();
        let mut plain = BloomFilter::new(777).unwrap();

        for i in 0..200u32 {
            concurrent.add(&i.to_be_bytes());
            plain.add(&i.to_be_bytes());
        }

        assert_eq!(concurrent.set_bits(), plain.set_bits());
        for i in 0..1000u32 {
            let key = i.to_be_bytes();
            assert_eq!(concurrent.query(&key), plain.query(&key));
        }
    }

    #[test]
    fn test_parallel_adds_lose_nothing() {
        let filter = Arc::new(ConcurrentBloomFilter::new(4096).unwrap());

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let filter = Arc::clone(&filter);
                thread::spawn(move || {
                    for i in 0..250u32 {
                        filter.add(format!("{}-{}", t, i).as_bytes());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(filter.len(), 1000);
        for t in 0..4u32 {
            for i in 0..250u32 {
                assert!(filter.contains(format!("{}-{}", t, i).as_bytes()));
            }
        }
    }

    #[test]
    fn test_word_count_rounds_up() {
        assert_eq!(ConcurrentBloomFilter::new(1).unwrap().words.len(), 1);
        assert_eq!(ConcurrentBloomFilter::new(64).unwrap().words.len(), 1);
        assert_eq!(ConcurrentBloomFilter::new(65).unwrap().words.len(), 2);
        assert_eq!(usize::MAX.div_ceil(WORD_BITS), usize::MAX / WORD_BITS + 1);
    }

    #[test]
    fn test_last_slot_addressable() {
        // Capacity that does not fill the last word
        let filter = ConcurrentBloomFilter::new(65).unwrap();
        for i in 0..500u32 {
            filter.add(&i.to_le_bytes());
        }
        assert!(filter.set_bits() <= 65);
        assert!(filter.load_factor() <= 1.0);
    }
}
