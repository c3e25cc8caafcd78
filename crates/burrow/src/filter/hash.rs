use std::io::Cursor;

/// Fixed seed so positions are stable across restarts of the same build.
const SEED: u32 = 0x5eed_b10f;

/// Computes `k` bit positions for `key` in a filter of `m` bits.
///
/// One MurmurHash3 x64/128 call provides both halves for
/// Kirsch-Mitzenmacher double hashing: `g_i = h1 + i * h2 (mod m)`.
pub(crate) fn positions(key: &[u8], k: usize, m: usize) -> impl Iterator<Item = usize> {
    let hash = murmur3::murmur3_x64_128(&mut Cursor::new(key), SEED).unwrap_or(0);
    let h1 = hash as u64;
    // An even h2 would cycle through fewer positions when m is a power of
    // two.
    let h2 = ((hash >> 64) as u64) | 1;
    let m = m as u64;

    (0..k as u64).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}
