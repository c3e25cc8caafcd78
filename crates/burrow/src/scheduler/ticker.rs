use super::manager::FillWorkers;
use crate::factory::Shared;
use core::time::Duration;
use std::sync::Arc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Periodic refill loop.
///
/// Ticks every `period` (the first tick fires immediately) and dispatches
/// every empty bucket to the fill workers. Stops as soon as `token` is
/// cancelled; dropping `workers` on exit lets the workers finish whatever is
/// queued and then stop on their own.
pub(crate) async fn run_ticker(
    shared: Arc<Shared>,
    workers: FillWorkers,
    period: Duration,
    token: CancellationToken,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    #[cfg(feature = "tracing")]
    tracing::debug!("Refill scheduler started, period {period:?}");

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {
                refill(&shared, &workers).await;
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Refill scheduler stopped");
}

/// Claims every empty bucket and queues it for filling.
///
/// Returns how many buckets were dispatched.
pub(crate) async fn refill(shared: &Shared, workers: &FillWorkers) -> usize {
    let mut dispatched = 0;

    for bucket in shared.pool.list_empty() {
        // Skip buckets that changed state since the snapshot.
        if !shared.pool.mark_busy(bucket) {
            continue;
        }

        match workers.dispatch(bucket).await {
            Ok(()) => dispatched += 1,
            Err(_e) => {
                shared.stats.record_aborted_fill();
                #[cfg(feature = "tracing")]
                tracing::error!("Bucket {bucket} could not be dispatched: {_e}");
            }
        }
    }

    #[cfg(feature = "tracing")]
    {
        if dispatched > 0 {
            tracing::debug!("Dispatched {dispatched} empty buckets");
        }
    }

    dispatched
}
