use crate::{Alphabet, Error, FilterParams, MAX_FILTER_BITS, Result};
use core::time::Duration;

/// Tuning knobs for a [`Factory`].
///
/// Every field has a production default; override what you need with struct
/// update syntax:
///
/// ```
/// use burrow::FactoryConfig;
///
/// let config = FactoryConfig {
///     bucket_count: 4,
///     bucket_capacity: 250,
///     ..FactoryConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// [`Factory`]: crate::Factory
#[derive(Clone, Debug)]
pub struct FactoryConfig {
    /// Symbols per identifier (`L`).
    pub id_length: usize,
    /// Number of buckets in the pool (`S`).
    pub bucket_count: usize,
    /// Identifiers per bucket (`C`).
    pub bucket_capacity: usize,
    /// Expected maximum number of identifiers the filter will ever hold
    /// (`M`), history included.
    pub filter_capacity: usize,
    /// Target false-positive rate of the filter (`E`), in `(0, 1)`.
    pub filter_error_rate: f64,
    /// How often the scheduler looks for empty buckets.
    pub refill_interval: Duration,
    /// Number of concurrent fill workers.
    pub fill_workers: usize,
    /// Abort a fill after this many rejected candidates in a row. `None`
    /// retries forever.
    pub max_consecutive_rejections: Option<u64>,
    /// Symbols identifiers are drawn from.
    pub alphabet: Alphabet,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            id_length: 7,
            bucket_count: 16,
            bucket_capacity: 1_000,
            filter_capacity: 10_000_000,
            filter_error_rate: 0.001,
            refill_interval: Duration::from_secs(1),
            fill_workers: num_cpus::get().max(1),
            max_consecutive_rejections: Some(10_000),
            alphabet: Alphabet::default(),
        }
    }
}

impl FactoryConfig {
    /// Checks that the configuration describes a usable factory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any size is zero, the error rate is
    /// outside `(0, 1)`, the filter would exceed [`MAX_FILTER_BITS`], or the
    /// identifier space for `id_length` is not
    /// larger than both the filter capacity and the total pool size.
    pub fn validate(&self) -> Result<()> {
        let nonzero = [
            ("id_length", self.id_length),
            ("bucket_count", self.bucket_count),
            ("bucket_capacity", self.bucket_capacity),
            ("filter_capacity", self.filter_capacity),
            ("fill_workers", self.fill_workers),
        ];
        if let Some((name, _)) = nonzero.iter().find(|(_, v)| *v == 0) {
            return invalid(format!("{name} must be greater than 0"));
        }

        if !(self.filter_error_rate > 0.0 && self.filter_error_rate < 1.0) {
            return invalid(format!(
                "filter_error_rate must be in (0, 1), got {}",
                self.filter_error_rate
            ));
        }

        let filter = FilterParams::optimal(self.filter_capacity, self.filter_error_rate);
        if filter.size_bits > MAX_FILTER_BITS {
            return invalid(format!(
                "a filter for {} identifiers at rate {} does not fit in memory",
                self.filter_capacity, self.filter_error_rate
            ));
        }

        if self.refill_interval.is_zero() {
            return invalid("refill_interval must be non-zero".to_string());
        }

        if self.max_consecutive_rejections == Some(0) {
            return invalid("max_consecutive_rejections must be greater than 0".to_string());
        }

        let pooled = (self.bucket_count as u128).saturating_mul(self.bucket_capacity as u128);
        let required = pooled.max(self.filter_capacity as u128);
        let keyspace = self.alphabet.keyspace(self.id_length);
        if keyspace <= required {
            return invalid(format!(
                "{} symbols of length {} give only {keyspace} identifiers, need more than {required}",
                self.alphabet.len(),
                self.id_length
            ));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> Result<()> {
    Err(Error::InvalidConfig { reason })
}
