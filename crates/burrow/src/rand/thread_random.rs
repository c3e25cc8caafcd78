use crate::{RandSource, Result};
use rand::{RngCore, rng};

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// Fast and automatically reseeded. Each OS thread has its own RNG instance,
/// so fill workers running on different blocking threads never contend. This
/// type does **not** store the RNG itself; it reaches for the thread-local
/// generator on every call, which keeps it `Send + Sync`.
///
/// This source never fails.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        rng().fill_bytes(dest);
        Ok(())
    }
}
