//! The identifier factory and what it needs from the outside world.
//!
//! - [`Factory`] - filter + pool + scheduler, and the `allocate` operation.
//! - [`FactoryConfig`] - sizes, rates and timings.
//! - [`HistorySource`] - previously issued identifiers used for warm-up.

mod config;
mod history;
mod service;
mod stats;

pub use config::*;
pub use history::*;
pub(crate) use service::Shared;
pub use service::{Factory, WarmupReport};
pub(crate) use stats::Counters;
pub use stats::FactoryStats;
