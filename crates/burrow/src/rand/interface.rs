use crate::Result;

/// A trait for random sources that fill byte buffers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. Implementations may fail (for example when the OS
/// entropy pool is unavailable); the fill loop treats such failures as
/// transient and simply tries again.
///
/// # Example
/// ```
/// use burrow::{RandSource, Result};
///
/// struct Zeroes;
/// impl RandSource for Zeroes {
///     fn fill(&self, dest: &mut [u8]) -> Result<()> {
///         dest.fill(0);
///         Ok(())
///     }
/// }
///
/// let mut buf = [1_u8; 4];
/// Zeroes.fill(&mut buf).unwrap();
/// assert_eq!(buf, [0; 4]);
/// ```
pub trait RandSource {
    /// Overwrites `dest` with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generation`] if the underlying source failed.
    ///
    /// [`Error::Generation`]: crate::Error::Generation
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

impl<R: RandSource + ?Sized> RandSource for std::sync::Arc<R> {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}
