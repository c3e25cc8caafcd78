pub mod error;
pub mod proto;
pub mod remote;

pub use error::*;
pub use remote::*;
