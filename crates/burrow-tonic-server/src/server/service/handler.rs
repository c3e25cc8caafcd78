//! `burrow.Bucket` service backed by a local [`Factory`].
//!
//! Each `Allocate` call takes one full bucket. The call never waits on the
//! refill scheduler; an empty pool answers `RESOURCE_EXHAUSTED` right away and
//! the client is expected to retry.

use crate::server::telemetry::{increment_allocations, increment_pool_exhausted};
use burrow_tonic_core::{
    Error,
    burrow::{self, Factory},
    proto::{AllocateRequest, AllocateResponse, bucket_server::Bucket},
};
use std::sync::Arc;
use tonic::{Request, Response, Status};

#[derive(Clone)]
pub struct BucketService {
    factory: Arc<Factory>,
}

impl BucketService {
    pub fn new(factory: Arc<Factory>) -> Self {
        Self { factory }
    }

    /// Stops refilling. Buckets that are already full can still be served.
    pub async fn shutdown(&self) {
        self.factory.shutdown().await;
    }
}

#[tonic::async_trait]
impl Bucket for BucketService {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    async fn allocate(
        &self,
        _req: Request<AllocateRequest>,
    ) -> Result<Response<AllocateResponse>, Status> {
        match self.factory.allocate() {
            Ok(ids) => {
                increment_allocations();
                Ok(Response::new(AllocateResponse {
                    ids: ids.into_iter().map(String::from).collect(),
                }))
            }
            Err(e) => {
                if e == burrow::Error::PoolExhausted {
                    increment_pool_exhausted();
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Allocation failed: {e}");
                }
                Err(Error::from(e).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_tonic_core::burrow::{BucketStatus, FactoryConfig};
    use core::time::Duration;
    use std::collections::HashSet;
    use tonic::Code;

    fn factory() -> Arc<Factory> {
        Arc::new(
            Factory::new(FactoryConfig {
                bucket_count: 2,
                bucket_capacity: 25,
                filter_capacity: 10_000,
                refill_interval: Duration::from_millis(10),
                fill_workers: 2,
                ..FactoryConfig::default()
            })
            .unwrap(),
        )
    }

    async fn wait_for_full(factory: &Factory) {
        for _ in 0..500 {
            if factory.pool().status(0) == Some(BucketStatus::Full) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("bucket 0 never filled");
    }

    #[tokio::test]
    async fn empty_pool_is_resource_exhausted() {
        let service = BucketService::new(factory());
        let status = service
            .allocate(Request::new(AllocateRequest {}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::ResourceExhausted);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn serves_full_batches() {
        let factory = factory();
        factory.run();
        wait_for_full(&factory).await;

        let service = BucketService::new(Arc::clone(&factory));
        let ids = service
            .allocate(Request::new(AllocateRequest {}))
            .await
            .unwrap()
            .into_inner()
            .ids;

        assert_eq!(ids.len(), 25);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 25);
        assert!(ids.iter().all(|id| id.len() == 7));
        assert!(ids.iter().all(|id| factory.filter().exists(id)));

        service.shutdown().await;
        assert!(!factory.is_running());
    }
}
