use super::{Counters, FactoryConfig, FactoryStats, HistorySource};
use crate::scheduler::{fill::FillPlan, manager::FillWorkers, ticker::run_ticker};
use crate::{BucketPool, Error, Identifier, MembershipFilter, RandSource, Result, ThreadRandom};
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// How often warm-up reports progress.
const WARMUP_PROGRESS_EVERY: u64 = 1_000_000;

/// State shared between the factory, the scheduler and the fill workers.
pub(crate) struct Shared {
    pub(crate) filter: MembershipFilter,
    pub(crate) pool: BucketPool,
    pub(crate) plan: FillPlan,
    pub(crate) rng: Arc<dyn RandSource + Send + Sync>,
    pub(crate) stats: Counters,
}

struct SchedulerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Outcome of [`Factory::prepare`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WarmupReport {
    /// Count reported by the history source.
    pub expected: u64,
    /// Identifiers added to the filter.
    pub loaded: u64,
    /// Rows that failed to read and were skipped.
    pub skipped: u64,
    /// Whether counting or opening the stream failed.
    pub degraded: bool,
}

/// The identifier factory.
///
/// Owns the membership filter, the bucket pool and the refill scheduler.
/// Typical lifecycle:
///
/// 1. [`Factory::new`] once per process.
/// 2. [`Factory::prepare`] to seed the filter from persisted history.
/// 3. [`Factory::run`] to start keeping the pool full.
/// 4. [`Factory::allocate`] from any number of consumers.
/// 5. [`Factory::shutdown`] to stop scheduling.
///
/// ```
/// use burrow::{Error, Factory, FactoryConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let factory = Factory::new(FactoryConfig::default()).unwrap();
/// // Nothing has been filled yet.
/// assert_eq!(factory.allocate(), Err(Error::PoolExhausted));
/// # }
/// ```
pub struct Factory {
    shared: Arc<Shared>,
    config: FactoryConfig,
    scheduler: Mutex<Option<SchedulerHandle>>,
}

impl Factory {
    /// Creates a factory that draws randomness from [`ThreadRandom`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails
    /// [`FactoryConfig::validate`].
    pub fn new(config: FactoryConfig) -> Result<Self> {
        Self::with_rand_source(config, ThreadRandom)
    }

    /// Creates a factory with a custom random source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails
    /// [`FactoryConfig::validate`].
    pub fn with_rand_source<R>(config: FactoryConfig, rng: R) -> Result<Self>
    where
        R: RandSource + Send + Sync + 'static,
    {
        config.validate()?;

        let shared = Shared {
            filter: MembershipFilter::new(config.filter_capacity, config.filter_error_rate),
            pool: BucketPool::new(config.bucket_count, config.bucket_capacity),
            plan: FillPlan {
                alphabet: config.alphabet.clone(),
                length: config.id_length,
                capacity: config.bucket_capacity,
                max_consecutive_rejections: config.max_consecutive_rejections,
            },
            rng: Arc::new(rng),
            stats: Counters::default(),
        };

        Ok(Self {
            shared: Arc::new(shared),
            config,
            scheduler: Mutex::new(None),
        })
    }

    /// The configuration this factory was built with.
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// The shared membership filter.
    pub fn filter(&self) -> &MembershipFilter {
        &self.shared.filter
    }

    /// The bucket pool.
    pub fn pool(&self) -> &BucketPool {
        &self.shared.pool
    }

    /// Seeds the filter with every identifier in `history`.
    ///
    /// Failures never abort startup: a failed count or stream leaves the
    /// filter as it is and marks the report `degraded`; unreadable rows are
    /// skipped. Either way some previously issued identifiers may be issued
    /// again, which is logged.
    #[cfg_attr(feature = "tracing", instrument(skip_all))]
    pub async fn prepare<H: HistorySource>(&self, history: &H) -> WarmupReport {
        let mut report = WarmupReport::default();

        report.expected = match history.count().await {
            Ok(count) => count,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to count issued identifiers: {_e}");
                report.degraded = true;
                return report;
            }
        };

        if report.expected == 0 {
            #[cfg(feature = "tracing")]
            tracing::info!("No issued identifiers to load");
            return report;
        }

        let mut rows = match history.stream().await {
            Ok(rows) => rows,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to stream issued identifiers: {_e}");
                report.degraded = true;
                return report;
            }
        };

        while let Some(row) = rows.next().await {
            match row {
                Ok(id) => {
                    self.shared.filter.add(id);
                    report.loaded += 1;
                    if report.loaded % WARMUP_PROGRESS_EVERY == 0 {
                        #[cfg(feature = "tracing")]
                        tracing::info!("Loaded {}/{} identifiers", report.loaded, report.expected);
                    }
                }
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Failed to read issued identifier: {_e}");
                    report.skipped += 1;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            skipped = report.skipped,
            "Cached {} issued identifiers",
            report.loaded
        );

        report
    }

    /// Starts the refill scheduler and its fill workers on the current Tokio
    /// runtime and returns immediately.
    ///
    /// Calling `run` on a factory that is already running does nothing.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn run(&self) {
        let mut scheduler = self.scheduler.lock();
        if scheduler.is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Refill scheduler already running");
            return;
        }

        let workers = FillWorkers::spawn(self.config.fill_workers, &self.shared);
        let token = CancellationToken::new();
        let task = tokio::spawn(run_ticker(
            Arc::clone(&self.shared),
            workers,
            self.config.refill_interval,
            token.clone(),
        ));

        #[cfg(feature = "tracing")]
        tracing::info!(
            buckets = self.config.bucket_count,
            capacity = self.config.bucket_capacity,
            workers = self.config.fill_workers,
            "Identifier factory running"
        );

        *scheduler = Some(SchedulerHandle { token, task });
    }

    /// Whether the scheduler has been started and not shut down.
    pub fn is_running(&self) -> bool {
        self.scheduler.lock().is_some()
    }

    /// Stops the periodic tick and waits for the scheduler task to exit.
    ///
    /// Fills already handed to workers still run to completion and publish
    /// their buckets; no new fills are scheduled afterwards.
    pub async fn shutdown(&self) {
        let Some(handle) = self.scheduler.lock().take() else {
            return;
        };

        handle.token.cancel();
        if let Err(_e) = handle.task.await {
            #[cfg(feature = "tracing")]
            tracing::error!("Refill scheduler ended abnormally: {_e}");
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Refill scheduler stopped");
    }

    /// Takes one full batch of `bucket_capacity` fresh identifiers.
    ///
    /// Never waits: if no bucket is full right now the call fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] when no batch is ready. Retry later.
    pub fn allocate(&self) -> Result<Vec<Identifier>> {
        match self.shared.pool.pop() {
            Some(ids) => {
                self.shared.stats.record_served();
                Ok(ids)
            }
            None => {
                self.shared.stats.record_exhausted();
                Err(Error::PoolExhausted)
            }
        }
    }

    /// Counters and pool occupancy.
    pub fn stats(&self) -> FactoryStats {
        self.shared.stats.snapshot(self.shared.pool.stats())
    }
}

impl Drop for Factory {
    fn drop(&mut self) {
        if let Some(handle) = self.scheduler.get_mut().take() {
            handle.token.cancel();
        }
    }
}
