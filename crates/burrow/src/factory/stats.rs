use crate::PoolStats;
use portable_atomic::{AtomicU64, Ordering};

/// Running counters shared by the factory, its scheduler and its workers.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    batches_served: AtomicU64,
    pool_exhausted: AtomicU64,
    buckets_filled: AtomicU64,
    fills_aborted: AtomicU64,
    candidates_rejected: AtomicU64,
    generation_errors: AtomicU64,
}

impl Counters {
    pub(crate) fn record_served(&self) {
        self.batches_served.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_exhausted(&self) {
        self.pool_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filled_bucket(&self) {
        self.buckets_filled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_aborted_fill(&self) {
        self.fills_aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejections(&self, n: u64) {
        self.candidates_rejected.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn record_generation_errors(&self, n: u64) {
        self.generation_errors.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, pool: PoolStats) -> FactoryStats {
        FactoryStats {
            batches_served: self.batches_served.load(Ordering::Relaxed),
            pool_exhausted: self.pool_exhausted.load(Ordering::Relaxed),
            buckets_filled: self.buckets_filled.load(Ordering::Relaxed),
            fills_aborted: self.fills_aborted.load(Ordering::Relaxed),
            candidates_rejected: self.candidates_rejected.load(Ordering::Relaxed),
            generation_errors: self.generation_errors.load(Ordering::Relaxed),
            pool,
        }
    }
}

/// Point-in-time view of what the factory has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FactoryStats {
    /// Successful `allocate` calls.
    pub batches_served: u64,
    /// `allocate` calls that found no full bucket.
    pub pool_exhausted: u64,
    /// Buckets published as full.
    pub buckets_filled: u64,
    /// Fills that were dispatched but never published.
    pub fills_aborted: u64,
    /// Candidates discarded by the filter.
    pub candidates_rejected: u64,
    /// Candidates lost to random source failures.
    pub generation_errors: u64,
    /// Buckets per state at snapshot time.
    pub pool: PoolStats,
}
