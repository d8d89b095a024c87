//! Utility functions for Bloom filters

use crate::storage::SlotStorage;
use crate::BloomFilter;

/// False positive rate predicted for a filter of `capacity` slots holding
/// `inserted` keys with `num_hashes` hash functions: `(1 - e^(-kn/m))^k`
pub fn theoretical_fpr(capacity: usize, inserted: usize, num_hashes: usize) -> f64 {
    if capacity == 0 || inserted == 0 || num_hashes == 0 {
        return 0.0;
    }

    let k = num_hashes as f64;
    let n = inserted as f64;
    let m = capacity as f64;
    (1.0 - (-k * n / m).exp()).powi(num_hashes as i32)
}

/// Number of `non_members` that `filter` reports as present
///
/// The keys must never have been added; every hit is then a false positive.
pub fn count_false_positives<S, K>(filter: &BloomFilter<S>, non_members: &[K]) -> usize
where
    S: SlotStorage,
    K: AsRef<[u8]>,
{
    non_members
        .iter()
        .filter(|key| filter.contains(key.as_ref()))
        .count()
}

/// Fraction of `non_members` that `filter` reports as present
pub fn measure_false_positive_rate<S, K>(filter: &BloomFilter<S>, non_members: &[K]) -> f64
where
    S: SlotStorage,
    K: AsRef<[u8]>,
{
    if non_members.is_empty() {
        return 0.0;
    }

    count_false_positives(filter, non_members) as f64 / non_members.len() as f64
}
