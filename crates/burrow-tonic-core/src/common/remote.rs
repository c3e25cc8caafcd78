//! [`BucketSource`] backed by a remote bucket server.

use crate::{
    proto::{AllocateRequest, bucket_client::BucketClient},
    status_to_error,
};
use burrow::{BucketSource, Identifier};
use tonic::transport::{Channel, Endpoint};

/// Fetches batches from a `burrow.Bucket` server.
///
/// Plugs into [`burrow::Reserve`] the same way a local
/// [`Factory`](burrow::Factory) does:
///
/// ```no_run
/// use burrow::Reserve;
/// use burrow_tonic_core::RemoteBucketSource;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let source = RemoteBucketSource::connect("http://127.0.0.1:50051").await?;
/// let reserve = Reserve::new(source);
/// let id = reserve.next_id().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RemoteBucketSource {
    client: BucketClient<Channel>,
}

impl RemoteBucketSource {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: BucketClient::new(channel),
        }
    }

    /// Connects to the server at `dst`.
    pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
    where
        D: TryInto<Endpoint>,
        D::Error: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        let client = BucketClient::connect(dst).await?;
        Ok(Self { client })
    }
}

impl BucketSource for RemoteBucketSource {
    async fn fetch(&self) -> burrow::Result<Vec<Identifier>> {
        // Clients are cheap handles over the shared channel.
        let mut client = self.client.clone();
        let response = client
            .allocate(AllocateRequest {})
            .await
            .map_err(status_to_error)?;
        Ok(response
            .into_inner()
            .ids
            .into_iter()
            .map(Identifier::from)
            .collect())
    }
}
