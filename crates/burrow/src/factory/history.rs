//! Access to identifiers issued by earlier runs.
//!
//! The factory reads this once, during [`Factory::prepare`], to seed its
//! filter. Implementations wrap whatever persists link records.
//!
//! [`Factory::prepare`]: crate::Factory::prepare

use crate::Result;
use core::future::Future;
use futures::stream::{self, BoxStream, StreamExt};

/// A read-only view of previously issued identifiers.
pub trait HistorySource {
    /// Number of identifiers the store knows about.
    fn count(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Streams every identifier the store knows about.
    ///
    /// Individual items may fail without ending the stream; the factory logs
    /// and skips them.
    fn stream(&self) -> impl Future<Output = Result<BoxStream<'_, Result<String>>>> + Send;
}

/// In-memory history, mostly useful for tests and embedded setups.
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    ids: Vec<String>,
}

impl MemoryHistory {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl HistorySource for MemoryHistory {
    async fn count(&self) -> Result<u64> {
        Ok(self.ids.len() as u64)
    }

    async fn stream(&self) -> Result<BoxStream<'_, Result<String>>> {
        Ok(stream::iter(self.ids.iter().cloned().map(Ok)).boxed())
    }
}
