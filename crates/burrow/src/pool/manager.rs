use super::{Bucket, BucketStatus, PoolStats};
use crate::Identifier;
use parking_lot::Mutex;

/// `S` buckets of `C` identifiers each, behind one exclusive lock.
///
/// All methods take the lock for a handful of field updates and release it
/// before returning. Nothing here generates identifiers.
#[derive(Debug)]
pub struct BucketPool {
    buckets: Mutex<Vec<Bucket>>,
    capacity: usize,
}

impl BucketPool {
    /// Creates `count` empty buckets, each accepting exactly `capacity`
    /// identifiers.
    pub fn new(count: usize, capacity: usize) -> Self {
        Self {
            buckets: Mutex::new((0..count).map(|_| Bucket::empty()).collect()),
            capacity,
        }
    }

    /// Number of buckets (`S`).
    pub fn bucket_count(&self) -> usize {
        self.buckets.lock().len()
    }

    /// Identifiers per full bucket (`C`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ascending indexes of every bucket currently `Empty`.
    pub fn list_empty(&self) -> Vec<usize> {
        self.buckets
            .lock()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.status == BucketStatus::Empty)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Claims bucket `idx` for filling.
    ///
    /// Returns `false` and changes nothing unless the bucket is `Empty`.
    pub fn mark_busy(&self, idx: usize) -> bool {
        let mut buckets = self.buckets.lock();
        match buckets.get_mut(idx) {
            Some(bucket) if bucket.status == BucketStatus::Empty => {
                bucket.status = BucketStatus::Busy;
                true
            }
            _ => false,
        }
    }

    /// Publishes a completed batch into bucket `idx`.
    ///
    /// Returns `false` and leaves the bucket untouched unless it is `Busy`
    /// and `ids` holds exactly [`capacity`](Self::capacity) identifiers.
    pub fn mark_full(&self, idx: usize, ids: Vec<Identifier>) -> bool {
        if ids.len() != self.capacity {
            return false;
        }
        let mut buckets = self.buckets.lock();
        match buckets.get_mut(idx) {
            Some(bucket) if bucket.status == BucketStatus::Busy => {
                bucket.ids = ids;
                bucket.status = BucketStatus::Full;
                true
            }
            _ => false,
        }
    }

    /// Takes the batch out of the lowest-indexed `Full` bucket and resets it
    /// to `Empty`.
    ///
    /// Returns `None` when no bucket is full. A partial batch is never
    /// returned.
    pub fn pop(&self) -> Option<Vec<Identifier>> {
        let mut buckets = self.buckets.lock();
        let bucket = buckets
            .iter_mut()
            .find(|b| b.status == BucketStatus::Full)?;
        bucket.status = BucketStatus::Empty;
        Some(core::mem::take(&mut bucket.ids))
    }

    /// Current state of bucket `idx`.
    pub fn status(&self, idx: usize) -> Option<BucketStatus> {
        self.buckets.lock().get(idx).map(|b| b.status)
    }

    /// Snapshot of how many buckets sit in each state.
    pub fn stats(&self) -> PoolStats {
        self.buckets
            .lock()
            .iter()
            .fold(PoolStats::default(), |mut stats, b| {
                match b.status {
                    BucketStatus::Empty => stats.empty += 1,
                    BucketStatus::Busy => stats.busy += 1,
                    BucketStatus::Full => stats.full += 1,
                }
                stats
            })
    }
}
