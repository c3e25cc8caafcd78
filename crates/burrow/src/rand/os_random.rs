use crate::{Error, RandSource, Result};
use rand::{TryRngCore, rngs::OsRng};

/// A `RandSource` that reads straight from the operating system's entropy
/// source.
///
/// Slower than [`ThreadRandom`] and fallible; failures surface as
/// [`Error::Generation`] and are retried by the fill loop.
///
/// [`ThreadRandom`]: crate::ThreadRandom
#[derive(Default, Clone, Copy, Debug)]
pub struct OsRandom;

impl RandSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| Error::Generation {
            reason: e.to_string(),
        })
    }
}
