//! Keeps the bucket pool full.
//!
//! ## Structure
//!
//! - [`fill`] - the generate / check / accept loop for one bucket.
//! - [`worker`] - a fill worker task draining its own request queue.
//! - [`manager`] - the fixed set of fill workers, fed round-robin.
//! - [`ticker`] - the periodic task that finds empty buckets and dispatches
//!   them.

pub(crate) mod fill;
pub(crate) mod manager;
pub(crate) mod ticker;
pub(crate) mod worker;
