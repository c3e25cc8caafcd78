use core::f64::consts::LN_2;

/// Largest filter, in bits, that can be allocated.
///
/// Matches the addressing limit of a `BitVec`, which also keeps the byte size
/// well below `isize::MAX`.
pub const MAX_FILTER_BITS: usize = usize::MAX >> 3;

/// Bloom filter sizing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParams {
    /// Number of bits in the filter (`m`).
    pub size_bits: usize,
    /// Number of hash functions (`k`).
    pub hash_count: usize,
}

impl FilterParams {
    /// Optimal parameters for `capacity` elements at `error_rate`.
    ///
    /// - `m = ceil(-n ln(p) / ln(2)^2)`
    /// - `k = round(m / n * ln(2))`, clamped to `1..=32`
    ///
    /// `error_rate` is expected in `(0, 1)`; callers validate it first.
    /// `size_bits` saturates at `usize::MAX` for sizes that cannot be
    /// represented, which is above [`MAX_FILTER_BITS`].
    pub fn optimal(capacity: usize, error_rate: f64) -> Self {
        if capacity == 0 {
            return Self {
                size_bits: 64,
                hash_count: 1,
            };
        }

        let n = capacity as f64;
        let m = (-n * error_rate.ln() / (LN_2 * LN_2)).ceil().max(64.0) as usize;
        let k = ((m as f64 / n) * LN_2).round() as usize;

        Self {
            size_bits: m,
            hash_count: k.clamp(1, 32),
        }
    }
}

/// False-positive rate of a filter with `m` bits, `k` hashes and `n`
/// insertions: `(1 - e^(-kn/m))^k`.
pub fn false_positive_rate(m: usize, k: usize, n: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
