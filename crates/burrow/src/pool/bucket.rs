use crate::Identifier;
use core::fmt;

/// Lifecycle state of a bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BucketStatus {
    /// Nothing inside; waiting for the scheduler.
    Empty,
    /// Claimed by a fill worker.
    Busy,
    /// Holds a complete batch ready to be handed out.
    Full,
}

impl fmt::Display for BucketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Busy => f.write_str("busy"),
            Self::Full => f.write_str("full"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Bucket {
    pub(crate) status: BucketStatus,
    pub(crate) ids: Vec<Identifier>,
}

impl Bucket {
    pub(crate) const fn empty() -> Self {
        Self {
            status: BucketStatus::Empty,
            ids: Vec::new(),
        }
    }
}

/// Point-in-time count of buckets per state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub empty: usize,
    pub busy: usize,
    pub full: usize,
}
