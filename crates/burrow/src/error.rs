//! Error types for the identifier factory.
//!
//! Only [`Error::PoolExhausted`] is meant to reach consumers of
//! [`Factory::allocate`]. Everything else is either absorbed inside the fill
//! loop, logged during warm-up, or reported when the factory is configured.
//!
//! [`Factory::allocate`]: crate::Factory::allocate

/// Result alias used throughout `burrow`.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `burrow` can emit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The history source could not be counted or streamed during warm-up.
    ///
    /// Never fatal: the factory keeps running with whatever it managed to
    /// load.
    #[error("warm-up query failed: {reason}")]
    WarmupQuery { reason: String },

    /// The randomness source failed while producing a candidate.
    #[error("identifier generation failed: {reason}")]
    Generation { reason: String },

    /// No full bucket was available. Callers should retry later.
    #[error("identifier pool exhausted")]
    PoolExhausted,

    /// A fill gave up after too many consecutive rejected candidates.
    ///
    /// This means the identifier space is (nearly) used up for the configured
    /// length. The bucket is left quarantined in the `Busy` state.
    #[error("bucket {bucket}: keyspace exhausted after {attempts} consecutive rejections")]
    KeyspaceExhausted { bucket: usize, attempts: u64 },

    /// The factory configuration is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A fill request could not reach its worker.
    #[error("channel error: {context}")]
    ChannelError { context: String },

    /// A remote bucket source could not be reached or answered with an
    /// unexpected status.
    #[error("remote source failed: {reason}")]
    Transport { reason: String },
}
