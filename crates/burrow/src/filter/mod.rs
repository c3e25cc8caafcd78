//! Probabilistic de-duplication of issued identifiers.
//!
//! - [`BloomFilter`] - the single-threaded bit array.
//! - [`MembershipFilter`] - the shared, lock-protected filter every fill
//!   worker consults.
//! - [`FilterParams`] - sizing derived from expected cardinality and target
//!   false-positive rate.

mod bloom;
mod hash;
mod membership;
mod params;

pub use bloom::*;
pub use membership::*;
pub use params::*;
