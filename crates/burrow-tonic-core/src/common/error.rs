//! Error types for the bucket service.
//!
//! [`Error`] wraps whatever the factory reports and converts into a
//! [`tonic::Status`] with a matching code. [`status_to_error`] goes the other
//! way for clients, so an exhausted server surfaces as
//! [`burrow::Error::PoolExhausted`] on the caller's side too.

use tonic::{Code, Status};

pub type Result<T> = core::result::Result<T, Error>;

/// Message sent with `RESOURCE_EXHAUSTED`.
pub const POOL_EXHAUSTED_MESSAGE: &str = "factory: no bucket is ready, retry later";

/// Unified error type for the bucket service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The factory refused the request.
    #[error("factory error: {0}")]
    Factory(#[from] burrow::Error),
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::Factory(burrow::Error::PoolExhausted) => {
                Status::resource_exhausted(POOL_EXHAUSTED_MESSAGE)
            }
            Error::Factory(e) => Status::internal(e.to_string()),
        }
    }
}

/// Maps a status returned by a bucket server onto the factory's error type.
pub fn status_to_error(status: Status) -> burrow::Error {
    match status.code() {
        Code::ResourceExhausted => burrow::Error::PoolExhausted,
        code => burrow::Error::Transport {
            reason: format!("{code:?}: {}", status.message()),
        },
    }
}
