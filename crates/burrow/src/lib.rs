#![doc = include_str!("../README.md")]

mod error;
mod factory;
mod filter;
mod id;
mod pool;
mod rand;
mod reserve;
mod scheduler;
#[cfg(test)]
mod test_support;

pub use crate::error::*;
pub use crate::factory::{
    Factory, FactoryConfig, FactoryStats, HistorySource, MemoryHistory, WarmupReport,
};
pub use crate::filter::*;
pub use crate::id::*;
pub use crate::pool::*;
pub use crate::rand::*;
pub use crate::reserve::*;
