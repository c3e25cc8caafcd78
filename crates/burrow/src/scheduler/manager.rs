//! Fixed-size pool of fill workers.
//!
//! Each worker listens on its own bounded [`mpsc::Receiver`]. Requests are
//! handed out round-robin, which caps the number of concurrently running
//! fills at the number of workers no matter how many buckets empty at once.

use super::worker::{FillRequest, worker_loop};
use crate::{Error, Result, factory::Shared};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

pub(crate) struct FillWorkers {
    workers: Vec<mpsc::Sender<FillRequest>>,
    next_worker: AtomicUsize,
}

impl FillWorkers {
    /// Spawns `count` worker tasks on the current runtime.
    ///
    /// Every queue can hold one request per bucket. A bucket is queued at
    /// most once while it is `Busy`, so dispatch never waits on a full
    /// queue.
    pub(crate) fn spawn(count: usize, shared: &Arc<Shared>) -> Self {
        let depth = shared.pool.bucket_count().max(1);
        let workers = (0..count)
            .map(|worker_id| {
                let (tx, rx) = mpsc::channel(depth);
                tokio::spawn(worker_loop(worker_id, rx, Arc::clone(shared)));
                tx
            })
            .collect();

        Self {
            workers,
            next_worker: AtomicUsize::new(0),
        }
    }

    /// Returns the index of the next worker to receive work (round-robin).
    fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Queues a fill for `bucket` on the next worker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelError`] if that worker has stopped.
    pub(crate) async fn dispatch(&self, bucket: usize) -> Result<()> {
        let worker_idx = self.next_worker_index();

        self.workers[worker_idx]
            .send(FillRequest { bucket })
            .await
            .map_err(|_| Error::ChannelError {
                context: format!("fill worker {worker_idx} channel closed"),
            })
    }
}
