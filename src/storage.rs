//! Slot storage strategies
//!
//! A filter's slots can be packed eight to a byte or kept as one flag per slot.
//! The choice trades memory for bit twiddling and is invisible through the
//! filter API.

use bit_vec::BitVec;

/// Fixed-length, set-only slot storage
pub trait SlotStorage {
    /// Short name used in logs and stats
    const NAME: &'static str;

    /// Allocate `len` unset slots
    fn with_len(len: usize) -> Self;

    /// Number of slots
    fn len(&self) -> usize;

    /// Mark slot `idx` as set. `idx` must be below `len()`.
    fn set(&mut self, idx: usize);

    /// Whether slot `idx` is set. Out-of-range slots read as unset.
    fn get(&self, idx: usize) -> bool;

    /// Number of set slots
    fn count_set(&self) -> usize;

    /// Indices of set slots, ascending
    fn set_indices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
}

/// Slots packed eight per byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSlots {
    bits: BitVec,
}

impl SlotStorage for PackedSlots {
    const NAME: &'static str = "packed";

    fn with_len(len: usize) -> Self {
        PackedSlots {
            bits: BitVec::from_elem(len, false),
        }
    }

    fn len(&self) -> usize {
        self.bits.len()
    }

    fn set(&mut self, idx: usize) {
        self.bits.set(idx, true);
    }

    fn get(&self, idx: usize) -> bool {
        self.bits.get(idx).unwrap_or(false)
    }

    fn count_set(&self) -> usize {
        self.bits.iter().filter(|&bit| bit).count()
    }

    fn set_indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(
            self.bits
                .iter()
                .enumerate()
                .filter_map(|(idx, bit)| bit.then_some(idx)),
        )
    }
}

/// One `bool` per slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSlots {
    flags: Vec<bool>,
}

impl SlotStorage for FlagSlots {
    const NAME: &'static str = "flags";

    fn with_len(len: usize) -> Self {
        FlagSlots {
            flags: vec![false; len],
        }
    }

    fn len(&self) -> usize {
        self.flags.len()
    }

    fn set(&mut self, idx: usize) {
        self.flags[idx] = true;
    }

    fn get(&self, idx: usize) -> bool {
        self.flags.get(idx).copied().unwrap_or(false)
    }

    fn count_set(&self) -> usize {
        self.flags.iter().filter(|&&flag| flag).count()
    }

    fn set_indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(
            self.flags
                .iter()
                .enumerate()
                .filter_map(|(idx, &flag)| flag.then_some(idx)),
        )
    }
}
