use crate::{Error, Result};
use std::sync::Arc;

/// The 64-symbol URL-safe alphabet used when none is configured.
pub const DEFAULT_ALPHABET: &str =
    "_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A validated set of symbols identifiers are drawn from.
///
/// Symbols are single ASCII bytes, so an identifier of length `L` is always
/// exactly `L` bytes long. Between 2 and 128 distinct symbols are accepted.
///
/// Cloning is cheap; the symbol table is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Arc<[u8]>,
    mask: u8,
}

impl Alphabet {
    /// Builds an alphabet from the characters of `symbols`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the alphabet is shorter than two
    /// symbols, contains non-ASCII characters or repeats a
    /// symbol.
    ///
    /// # Example
    /// ```
    /// use burrow::Alphabet;
    ///
    /// let hex = Alphabet::new("0123456789abcdef").unwrap();
    /// assert_eq!(hex.len(), 16);
    /// assert!(Alphabet::new("aa").is_err());
    /// ```
    pub fn new(symbols: &str) -> Result<Self> {
        let bytes = symbols.as_bytes();

        if !symbols.is_ascii() {
            return Err(Error::InvalidConfig {
                reason: "alphabet must be ASCII".to_string(),
            });
        }
        if bytes.len() < 2 {
            return Err(Error::InvalidConfig {
                reason: format!("alphabet must hold at least 2 symbols, got {}", bytes.len()),
            });
        }

        let mut seen = [false; 128];
        for &b in bytes {
            if core::mem::replace(&mut seen[b as usize], true) {
                return Err(Error::InvalidConfig {
                    reason: format!("alphabet repeats symbol {:?}", b as char),
                });
            }
        }

        // Smallest all-ones mask covering every index. Indexes above the
        // alphabet length are rejected by the generator, which keeps symbol
        // selection uniform.
        let mask = (bytes.len().next_power_of_two() - 1) as u8;

        Ok(Self {
            symbols: Arc::from(bytes),
            mask,
        })
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index`, if any.
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }

    pub(crate) fn mask(&self) -> u8 {
        self.mask
    }

    /// Whether every byte of `candidate` belongs to this alphabet.
    pub fn contains_all(&self, candidate: &str) -> bool {
        candidate.bytes().all(|b| self.symbols.contains(&b))
    }

    /// Number of distinct identifiers of `length` symbols, saturating at
    /// `u128::MAX`.
    pub fn keyspace(&self, length: usize) -> u128 {
        let base = self.symbols.len() as u128;
        (0..length).fold(1_u128, |acc, _| acc.saturating_mul(base))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let bytes = DEFAULT_ALPHABET.as_bytes();
        Self {
            symbols: Arc::from(bytes),
            mask: 63,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet_is_url_safe() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 64);
        assert_eq!(alphabet.mask(), 63);
        assert_eq!(alphabet, Alphabet::new(DEFAULT_ALPHABET).unwrap());
        assert!(alphabet.contains_all("Ab_-09z"));
        assert!(!alphabet.contains_all("a+b"));
    }

    #[test]
    fn rejects_bad_alphabets() {
        assert!(Alphabet::new("").is_err());
        assert!(Alphabet::new("x").is_err());
        assert!(Alphabet::new("abca").is_err());
        assert!(Alphabet::new("abé").is_err());
    }

    #[test]
    fn mask_covers_odd_sizes() {
        assert_eq!(Alphabet::new("abc").unwrap().mask(), 3);
        assert_eq!(Alphabet::new("0123456789").unwrap().mask(), 15);
        assert_eq!(Alphabet::new("ab").unwrap().mask(), 1);
    }

    #[test]
    fn keyspace_grows_and_saturates() {
        let hex = Alphabet::new("0123456789abcdef").unwrap();
        assert_eq!(hex.keyspace(0), 1);
        assert_eq!(hex.keyspace(4), 65_536);
        assert_eq!(Alphabet::default().keyspace(7), 64_u128.pow(7));
        assert_eq!(Alphabet::default().keyspace(64), u128::MAX);
    }
}
