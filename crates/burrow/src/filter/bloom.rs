use super::{
    hash::positions,
    params::{FilterParams, false_positive_rate},
};
use bitvec::prelude::*;

/// A plain Bloom filter over byte strings.
///
/// No false negatives: once a key has been inserted, [`contains`] returns
/// `true` for it forever. Keys are never removed.
///
/// Not synchronised; see [`MembershipFilter`] for the shared variant.
///
/// [`contains`]: BloomFilter::contains
/// [`MembershipFilter`]: crate::MembershipFilter
#[derive(Clone, Debug)]
pub struct BloomFilter {
    bits: BitVec<u64, Lsb0>,
    hash_count: usize,
    len: usize,
}

impl BloomFilter {
    /// Creates a filter sized for `capacity` keys at `error_rate`.
    pub fn new(capacity: usize, error_rate: f64) -> Self {
        Self::with_params(FilterParams::optimal(capacity, error_rate))
    }

    /// Creates a filter with explicit sizing.
    pub fn with_params(params: FilterParams) -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; params.size_bits.max(1)],
            hash_count: params.hash_count.max(1),
            len: 0,
        }
    }

    /// Records `key`. Idempotent with respect to membership.
    pub fn insert(&mut self, key: &[u8]) {
        let m = self.bits.len();
        for pos in positions(key, self.hash_count, m) {
            self.bits.set(pos, true);
        }
        self.len += 1;
    }

    /// Whether `key` was possibly inserted.
    pub fn contains(&self, key: &[u8]) -> bool {
        let m = self.bits.len();
        positions(key, self.hash_count, m).all(|pos| self.bits[pos])
    }

    /// Inserts `key` unless it is possibly present already.
    ///
    /// Returns `true` if the key was inserted.
    pub fn insert_if_absent(&mut self, key: &[u8]) -> bool {
        if self.contains(key) {
            return false;
        }
        self.insert(key);
        true
    }

    /// Number of insertions so far (repeats included).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the bit array.
    pub fn size_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of hash functions.
    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    /// Current expected false-positive rate given the insertions so far.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        false_positive_rate(self.bits.len(), self.hash_count, self.len)
    }
}
