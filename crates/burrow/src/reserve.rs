//! Single-identifier dispenser over batches.
//!
//! Creating a link needs one identifier, but the factory hands out whole
//! batches. A [`Reserve`] keeps the current batch and pulls a new one from its
//! [`BucketSource`] whenever it runs dry.

use crate::{Error, Factory, Identifier, Result};
use core::future::Future;
use parking_lot::Mutex;
use std::sync::Arc;

/// Anything that can hand out a batch of fresh identifiers.
pub trait BucketSource {
    /// Fetches one batch.
    ///
    /// # Errors
    ///
    /// [`Error::PoolExhausted`] when no batch is ready; transport errors for
    /// remote sources.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Identifier>>> + Send;
}

impl BucketSource for Factory {
    async fn fetch(&self) -> Result<Vec<Identifier>> {
        self.allocate()
    }
}

impl<S> BucketSource for Arc<S>
where
    S: BucketSource + Send + Sync,
{
    fn fetch(&self) -> impl Future<Output = Result<Vec<Identifier>>> + Send {
        (**self).fetch()
    }
}

/// Hands out identifiers one at a time.
///
/// ```
/// use burrow::{Error, Factory, FactoryConfig, Reserve};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let factory = Arc::new(Factory::new(FactoryConfig::default()).unwrap());
/// let reserve = Reserve::new(Arc::clone(&factory));
/// // The factory has not been started, so there is nothing to hand out.
/// assert_eq!(reserve.next_id().await, Err(Error::PoolExhausted));
/// # }
/// ```
pub struct Reserve<S> {
    source: S,
    ids: Mutex<Vec<Identifier>>,
}

impl<S: BucketSource> Reserve<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ids: Mutex::new(Vec::new()),
        }
    }

    /// Returns the next unused identifier, fetching a batch if none is left.
    ///
    /// Concurrent callers that find the reserve empty may each fetch a batch;
    /// the extra identifiers are kept for later calls.
    ///
    /// # Errors
    ///
    /// Propagates the source's error, typically [`Error::PoolExhausted`].
    pub async fn next_id(&self) -> Result<Identifier> {
        if let Some(id) = self.ids.lock().pop() {
            return Ok(id);
        }

        let mut batch = self.source.fetch().await?;
        let id = batch.pop().ok_or(Error::PoolExhausted)?;
        self.ids.lock().append(&mut batch);
        Ok(id)
    }

    /// Identifiers currently held.
    pub fn remaining(&self) -> usize {
        self.ids.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `batches` numbered batches of `size`, then reports exhaustion.
    struct Counted {
        batches: usize,
        size: usize,
        served: AtomicUsize,
    }

    impl BucketSource for Counted {
        async fn fetch(&self) -> Result<Vec<Identifier>> {
            let n = self.served.fetch_add(1, Ordering::Relaxed);
            if n >= self.batches {
                return Err(Error::PoolExhausted);
            }
            Ok((0..self.size)
                .map(|i| Identifier::from(format!("{n}-{i}")))
                .collect())
        }
    }

    #[tokio::test]
    async fn serves_every_identifier_once() {
        let reserve = Reserve::new(Counted {
            batches: 3,
            size: 4,
            served: AtomicUsize::new(0),
        });

        let mut seen = HashSet::new();
        for _ in 0..12 {
            assert!(seen.insert(reserve.next_id().await.unwrap()));
        }
        assert_eq!(reserve.remaining(), 0);
        assert_eq!(reserve.next_id().await, Err(Error::PoolExhausted));
    }

    #[tokio::test]
    async fn fetches_only_when_dry() {
        let source = Arc::new(Counted {
            batches: 10,
            size: 5,
            served: AtomicUsize::new(0),
        });
        let reserve = Reserve::new(Arc::clone(&source));

        reserve.next_id().await.unwrap();
        assert_eq!(reserve.remaining(), 4);
        for _ in 0..4 {
            reserve.next_id().await.unwrap();
        }
        assert_eq!(source.served.load(Ordering::Relaxed), 1);

        reserve.next_id().await.unwrap();
        assert_eq!(source.served.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn empty_batches_count_as_exhaustion() {
        let reserve = Reserve::new(Counted {
            batches: 1,
            size: 0,
            served: AtomicUsize::new(0),
        });
        assert_eq!(reserve.next_id().await, Err(Error::PoolExhausted));
    }
}
