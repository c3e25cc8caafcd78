#![doc = include_str!("../README.md")]

mod common;
pub use common::*;
// Downstream crates reach the core library as `burrow_tonic_core::burrow`.
pub use burrow;
