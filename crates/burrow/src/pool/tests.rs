use crate::{BucketPool, BucketStatus, Identifier, PoolStats};
use std::collections::HashSet;
use std::sync::Mutex;
use std::thread::scope;

fn batch(prefix: &str, n: usize) -> Vec<Identifier> {
    (0..n).map(|i| Identifier::from(format!("{prefix}{i}"))).collect()
}

#[test]
fn starts_empty() {
    let pool = BucketPool::new(3, 2);
    assert_eq!(pool.bucket_count(), 3);
    assert_eq!(pool.capacity(), 2);
    assert_eq!(pool.list_empty(), vec![0, 1, 2]);
    assert_eq!(
        pool.stats(),
        PoolStats {
            empty: 3,
            busy: 0,
            full: 0
        }
    );
    assert!(pool.pop().is_none());
}

#[test]
fn follows_the_state_machine() {
    let pool = BucketPool::new(1, 2);

    assert!(pool.mark_busy(0));
    assert_eq!(pool.status(0), Some(BucketStatus::Busy));
    assert!(pool.list_empty().is_empty());

    assert!(pool.mark_full(0, batch("a", 2)));
    assert_eq!(pool.status(0), Some(BucketStatus::Full));

    let ids = pool.pop().unwrap();
    assert_eq!(ids, batch("a", 2));
    assert_eq!(pool.status(0), Some(BucketStatus::Empty));
    assert_eq!(pool.list_empty(), vec![0]);
}

#[test]
fn rejects_out_of_order_transitions() {
    let pool = BucketPool::new(1, 2);

    // Empty -> Full is not a transition.
    assert!(!pool.mark_full(0, batch("a", 2)));
    assert_eq!(pool.status(0), Some(BucketStatus::Empty));

    assert!(pool.mark_busy(0));
    // Busy -> Busy is a no-op failure.
    assert!(!pool.mark_busy(0));

    assert!(pool.mark_full(0, batch("a", 2)));
    // Full -> Busy and Full -> Full are refused.
    assert!(!pool.mark_busy(0));
    assert!(!pool.mark_full(0, batch("b", 2)));
    assert_eq!(pool.pop().unwrap(), batch("a", 2));
}

#[test]
fn refuses_partial_batches() {
    let pool = BucketPool::new(1, 3);
    assert!(pool.mark_busy(0));
    assert!(!pool.mark_full(0, batch("a", 2)));
    assert!(!pool.mark_full(0, batch("a", 4)));
    assert_eq!(pool.status(0), Some(BucketStatus::Busy));
    assert!(pool.pop().is_none());
}

#[test]
fn unknown_index_is_refused() {
    let pool = BucketPool::new(1, 1);
    assert!(!pool.mark_busy(7));
    assert!(!pool.mark_full(7, batch("a", 1)));
    assert_eq!(pool.status(7), None);
}

#[test]
fn pops_lowest_full_index_first() {
    let pool = BucketPool::new(3, 1);
    for idx in [2, 0] {
        assert!(pool.mark_busy(idx));
        assert!(pool.mark_full(idx, batch(&idx.to_string(), 1)));
    }
    assert!(pool.mark_busy(1));

    assert_eq!(pool.pop().unwrap(), batch("0", 1));
    assert_eq!(pool.pop().unwrap(), batch("2", 1));
    assert!(pool.pop().is_none());
    assert_eq!(
        pool.stats(),
        PoolStats {
            empty: 2,
            busy: 1,
            full: 0
        }
    );
}

#[test]
fn concurrent_pops_never_share_a_batch() {
    const BUCKETS: usize = 64;
    const THREADS: usize = 8;

    let pool = BucketPool::new(BUCKETS, 4);
    for idx in 0..BUCKETS {
        assert!(pool.mark_busy(idx));
        assert!(pool.mark_full(idx, batch(&format!("{idx}-"), 4)));
    }

    let seen = Mutex::new(HashSet::new());
    scope(|s| {
        for _ in 0..THREADS {
            let (pool, seen) = (&pool, &seen);
            s.spawn(move || {
                while let Some(ids) = pool.pop() {
                    assert_eq!(ids.len(), 4);
                    let mut set = seen.lock().unwrap();
                    for id in ids {
                        assert!(set.insert(id));
                    }
                }
            });
        }
    });

    assert_eq!(seen.lock().unwrap().len(), BUCKETS * 4);
    assert_eq!(pool.list_empty().len(), BUCKETS);
}
