use super::BloomFilter;
use parking_lot::RwLock;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// The shared "has this identifier possibly been issued?" set.
///
/// Wraps a [`BloomFilter`] in a [`RwLock`] so any number of fill workers and
/// the warm-up loader may use it concurrently:
///
/// - [`exists`] takes a shared lock.
/// - [`add`] and [`insert_if_absent`] take the exclusive lock.
///
/// [`insert_if_absent`] performs the membership test and the insertion under
/// the same exclusive lock. Two workers racing on the same candidate are
/// therefore serialised: exactly one of them sees `true`.
///
/// [`exists`]: MembershipFilter::exists
/// [`add`]: MembershipFilter::add
/// [`insert_if_absent`]: MembershipFilter::insert_if_absent
#[derive(Debug)]
pub struct MembershipFilter {
    inner: RwLock<BloomFilter>,
}

impl MembershipFilter {
    /// Creates a filter sized for `capacity` identifiers at `error_rate`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug"))]
    pub fn new(capacity: usize, error_rate: f64) -> Self {
        let bloom = BloomFilter::new(capacity, error_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bits = bloom.size_bits(),
            hashes = bloom.hash_count(),
            "membership filter allocated"
        );

        Self {
            inner: RwLock::new(bloom),
        }
    }

    /// Records `key` as issued.
    pub fn add(&self, key: impl AsRef<[u8]>) {
        self.inner.write().insert(key.as_ref());
    }

    /// Whether `key` was possibly issued before.
    pub fn exists(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.read().contains(key.as_ref())
    }

    /// Atomically accepts `key` if it was not possibly issued before.
    ///
    /// Returns `true` if this call accepted the key.
    pub fn insert_if_absent(&self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        // Cheap shared check first; most rejections never need the write
        // lock.
        if self.inner.read().contains(key) {
            return false;
        }
        self.inner.write().insert_if_absent(key)
    }

    /// Number of insertions so far.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Size of the bit array.
    pub fn size_bits(&self) -> usize {
        self.inner.read().size_bits()
    }

    /// Number of hash functions.
    pub fn hash_count(&self) -> usize {
        self.inner.read().hash_count()
    }

    /// Current expected false-positive rate.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.inner.read().estimated_false_positive_rate()
    }
}
