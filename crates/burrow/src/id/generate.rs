use crate::{Alphabet, Identifier, RandSource, Result};

/// Produces a random identifier of `length` symbols drawn from `alphabet`.
///
/// Random bytes are masked down to the smallest power of two covering the
/// alphabet; masked values past the end of the alphabet are thrown away and
/// more bytes are drawn, so every symbol is equally likely whatever the
/// alphabet size.
///
/// # Errors
///
/// Propagates [`Error::Generation`] from the random source.
///
/// # Example
/// ```
/// use burrow::{Alphabet, ThreadRandom, generate};
///
/// let id = generate(&Alphabet::default(), 7, &ThreadRandom).unwrap();
/// assert_eq!(id.len(), 7);
/// ```
///
/// [`Error::Generation`]: crate::Error::Generation
pub fn generate<R>(alphabet: &Alphabet, length: usize, rng: &R) -> Result<Identifier>
where
    R: RandSource + ?Sized,
{
    let mask = alphabet.mask();
    let mut out = String::with_capacity(length);

    // Over-draw a little so odd-sized alphabets rarely need a second round.
    let step = (length + length / 2).max(8);
    let mut buf = vec![0_u8; step];

    while out.len() < length {
        rng.fill(&mut buf)?;
        for &byte in &buf {
            if let Some(symbol) = alphabet.symbol((byte & mask) as usize) {
                out.push(symbol as char);
                if out.len() == length {
                    break;
                }
            }
        }
    }

    Ok(Identifier::from(out))
}
