use super::fill::fill_batch;
use crate::factory::Shared;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A request for a worker to fill one bucket.
///
/// The bucket is already `Busy` when the request is queued.
#[derive(Debug)]
pub(crate) struct FillRequest {
    pub(crate) bucket: usize,
}

/// Fill worker task.
///
/// Drains `rx` one request at a time. The fill itself is CPU-bound and runs
/// on Tokio's blocking pool so the async workers are never held by a spinning
/// loop; this task only waits for it to finish and publishes the batch.
///
/// Runs until every sender is dropped, which happens when the scheduler
/// stops. Requests already queued at that point are still served.
pub(crate) async fn worker_loop(
    worker_id: usize,
    mut rx: mpsc::Receiver<FillRequest>,
    shared: Arc<Shared>,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Fill worker {worker_id} started");

    while let Some(FillRequest { bucket }) = rx.recv().await {
        let job = Arc::clone(&shared);
        let result = tokio::task::spawn_blocking(move || run_fill(worker_id, bucket, &job)).await;

        if let Err(_e) = result {
            // A panic inside the fill leaves the bucket Busy; nothing else
            // is affected.
            #[cfg(feature = "tracing")]
            tracing::error!("Fill worker {worker_id} lost bucket {bucket}: {_e}");
            shared.stats.record_aborted_fill();
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Fill worker {worker_id} stopped");
}

fn run_fill(_worker_id: usize, bucket: usize, shared: &Shared) {
    let start = std::time::Instant::now();

    #[cfg(feature = "tracing")]
    tracing::info!("Filling bucket {bucket} on worker {_worker_id}");

    match fill_batch(bucket, &shared.plan, &shared.filter, &*shared.rng) {
        Ok(outcome) => {
            shared.stats.record_rejections(outcome.rejected);
            shared.stats.record_generation_errors(outcome.generation_errors);

            if shared.pool.mark_full(bucket, outcome.ids) {
                shared.stats.record_filled_bucket();
                #[cfg(feature = "tracing")]
                tracing::info!(
                    rejected = outcome.rejected,
                    "Filled bucket {bucket} in {:?}",
                    start.elapsed()
                );
            } else {
                #[cfg(feature = "tracing")]
                tracing::error!("Bucket {bucket} was not busy when its fill completed");
            }
        }
        Err(_e) => {
            shared.stats.record_aborted_fill();
            #[cfg(feature = "tracing")]
            tracing::error!(
                "Abandoning bucket {bucket} after {:?}, it stays busy: {_e}",
                start.elapsed()
            );
        }
    }

    #[cfg(not(feature = "tracing"))]
    let _ = start;
}
