//! Deterministic random sources for tests.

use crate::{Alphabet, Error, RandSource, Result, ThreadRandom};
use parking_lot::Mutex;
use std::collections::VecDeque;
use core::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays the given candidates (default alphabet, one per `fill` call), then
/// falls back to [`ThreadRandom`].
pub(crate) struct Scripted {
    script: Mutex<VecDeque<String>>,
    alphabet: Alphabet,
}

impl Scripted {
    pub(crate) fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(candidates.into_iter().map(Into::into).collect()),
            alphabet: Alphabet::default(),
        }
    }
}

impl RandSource for Scripted {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let Some(next) = self.script.lock().pop_front() else {
            return ThreadRandom.fill(dest);
        };
        assert!(next.len() <= dest.len(), "scripted candidate too long");
        for (slot, symbol) in dest.iter_mut().zip(next.bytes()) {
            *slot = (0..self.alphabet.len())
                .find(|&i| self.alphabet.symbol(i) == Some(symbol))
                .expect("scripted symbol outside the default alphabet")
                as u8;
        }
        Ok(())
    }
}

/// Fails the first `n` calls, then behaves like [`ThreadRandom`].
pub(crate) struct BrokenThen {
    remaining: AtomicUsize,
}

impl BrokenThen {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(n),
        }
    }
}

impl RandSource for BrokenThen {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let failed = self
            .remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(Error::Generation {
                reason: "entropy unavailable".to_string(),
            });
        }
        ThreadRandom.fill(dest)
    }
}

/// Sleeps for `delay` on every call, then behaves like [`ThreadRandom`].
pub(crate) struct Slow {
    delay: Duration,
}

impl Slow {
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl RandSource for Slow {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        std::thread::sleep(self.delay);
        ThreadRandom.fill(dest)
    }
}
