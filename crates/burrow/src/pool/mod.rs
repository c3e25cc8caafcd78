//! Fixed set of identifier batches guarded by a single lock.
//!
//! Each bucket moves through `Empty -> Busy -> Full -> Empty`. The lock is
//! held only for those transitions; generating identifiers happens outside.

mod bucket;
mod manager;
#[cfg(test)]
mod tests;

pub use bucket::*;
pub use manager::*;
