//! gRPC service implementation.
//!
//! - [`handler`]: the `burrow.Bucket` entry point (`BucketService`).

pub mod handler;
