//! # Fixed Bloom
//!
//! A fixed-size Bloom filter answering "possibly present" or "definitely absent"
//! for byte-string keys. Slots are indexed by two seeded MurmurHash3 functions
//! and stored either bit-packed or one flag per slot.

pub mod bloom;
pub mod hash;
pub mod storage;
pub mod sync;
pub mod utils;

pub use bloom::{BloomFilter, BloomStats, Verdict};
pub use hash::{HashFunction, Murmur3Hash};
pub use storage::{FlagSlots, PackedSlots, SlotStorage};
pub use sync::ConcurrentBloomFilter;

/// Common error types for the library
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BloomError {
    /// Zero capacity or an unknown hash function index
    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, BloomError>;
