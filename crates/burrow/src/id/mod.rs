mod alphabet;
mod generate;
mod identifier;

pub use alphabet::*;
pub use generate::*;
pub use identifier::*;
