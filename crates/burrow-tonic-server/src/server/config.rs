//! Command-line and environment configuration for the server.
//!
//! Every flag falls back to an environment variable, and `main` loads a
//! `.env` file first, so deployments can configure the server either way.

use anyhow::bail;
use burrow_tonic_core::burrow::{Alphabet, FactoryConfig};
use clap::Parser;
use core::time::Duration;
use std::path::PathBuf;

/// Runtime configuration for the `burrow-tonic-server` binary.
///
/// Sizes the identifier factory (length, pool shape, filter) and picks where
/// the server listens. The factory-facing values are checked again by
/// [`FactoryConfig::validate`] when converting into a [`ServerConfig`].
#[derive(Parser, Debug, Clone)]
#[command(
    name = "burrow-tonic-server",
    version,
    about = "A gRPC service handing out batches of fresh short identifiers"
)]
pub struct CliArgs {
    /// Symbols per identifier
    #[arg(long, env = "ID_LENGTH", default_value_t = 7)]
    pub id_length: usize,

    /// Symbols identifiers are drawn from. Defaults to `_-0-9a-zA-Z`
    #[arg(long, env = "ALPHABET")]
    pub alphabet: Option<String>,

    /// Number of buckets kept in the pool
    #[arg(long, env = "BUCKET_COUNT", default_value_t = 16)]
    pub bucket_count: usize,

    /// Identifiers per bucket, and per `Allocate` response
    #[arg(long, env = "BUCKET_CAPACITY", default_value_t = 1_000)]
    pub bucket_capacity: usize,

    /// Expected maximum number of identifiers ever issued
    #[arg(long, env = "FILTER_CAPACITY", default_value_t = 10_000_000)]
    pub filter_capacity: usize,

    /// Target false-positive rate of the membership filter
    #[arg(long, env = "FILTER_ERROR_RATE", default_value_t = 0.001)]
    pub filter_error_rate: f64,

    /// Milliseconds between refill passes
    #[arg(long, env = "REFILL_INTERVAL_MS", default_value_t = 1_000)]
    pub refill_interval_ms: u64,

    /// Concurrent fill workers. Defaults to the number of CPUs
    #[arg(long, env = "FILL_WORKERS")]
    pub fill_workers: Option<usize>,

    /// Rejected candidates in a row before a fill gives up. 0 never gives up
    #[arg(long, env = "MAX_REJECTIONS", default_value_t = 10_000)]
    pub max_rejections: u64,

    /// Newline-delimited file of previously issued identifiers
    #[arg(long, env = "HISTORY_FILE")]
    pub history_file: Option<PathBuf>,

    /// Address to listen on, or a socket path with `--uds`
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:50051")]
    pub server_addr: String,

    /// Listen on a Unix domain socket at `server_addr`
    #[arg(long, env = "UDS", default_value_t = false)]
    pub uds: bool,
}

/// Validated configuration derived from [`CliArgs`].
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_addr: String,
    pub uds: bool,
    pub history_file: Option<PathBuf>,
    pub factory: FactoryConfig,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.refill_interval_ms == 0 {
            bail!("--refill-interval-ms must be greater than 0");
        }
        if args.fill_workers == Some(0) {
            bail!("--fill-workers must be greater than 0");
        }
        if args.server_addr.trim().is_empty() {
            bail!("--server-addr must not be empty");
        }

        let defaults = FactoryConfig::default();
        let alphabet = match args.alphabet.as_deref() {
            Some(symbols) => Alphabet::new(symbols)?,
            None => defaults.alphabet.clone(),
        };

        let factory = FactoryConfig {
            id_length: args.id_length,
            bucket_count: args.bucket_count,
            bucket_capacity: args.bucket_capacity,
            filter_capacity: args.filter_capacity,
            filter_error_rate: args.filter_error_rate,
            refill_interval: Duration::from_millis(args.refill_interval_ms),
            fill_workers: args.fill_workers.unwrap_or(defaults.fill_workers),
            max_consecutive_rejections: (args.max_rejections > 0).then_some(args.max_rejections),
            alphabet,
        };
        factory.validate()?;

        Ok(Self {
            server_addr: args.server_addr,
            uds: args.uds,
            history_file: args.history_file,
            factory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(core::iter::once("burrow-tonic-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_build_a_valid_config() {
        let config = ServerConfig::try_from(parse(&[])).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:50051");
        assert!(!config.uds);
        assert!(config.history_file.is_none());
        assert_eq!(config.factory.id_length, 7);
        assert_eq!(config.factory.bucket_capacity, 1_000);
        assert_eq!(config.factory.refill_interval, Duration::from_secs(1));
        assert_eq!(config.factory.max_consecutive_rejections, Some(10_000));
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_from(parse(&[
            "--id-length",
            "9",
            "--bucket-count",
            "4",
            "--bucket-capacity",
            "250",
            "--refill-interval-ms",
            "200",
            "--fill-workers",
            "2",
            "--max-rejections",
            "0",
            "--history-file",
            "/var/lib/burrow/issued.txt",
        ]))
        .unwrap();
        assert_eq!(config.factory.id_length, 9);
        assert_eq!(config.factory.bucket_count, 4);
        assert_eq!(config.factory.bucket_capacity, 250);
        assert_eq!(config.factory.refill_interval, Duration::from_millis(200));
        assert_eq!(config.factory.fill_workers, 2);
        assert_eq!(config.factory.max_consecutive_rejections, None);
        assert_eq!(
            config.history_file,
            Some(PathBuf::from("/var/lib/burrow/issued.txt"))
        );
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(ServerConfig::try_from(parse(&["--refill-interval-ms", "0"])).is_err());
        assert!(ServerConfig::try_from(parse(&["--fill-workers", "0"])).is_err());
        assert!(ServerConfig::try_from(parse(&["--bucket-capacity", "0"])).is_err());
        assert!(ServerConfig::try_from(parse(&["--filter-error-rate", "1.5"])).is_err());
        assert!(ServerConfig::try_from(parse(&["--alphabet", "aa"])).is_err());
        // 10^3 identifiers cannot cover a filter sized for ten million.
        assert!(ServerConfig::try_from(parse(&["--alphabet", "0123456789", "--id-length", "3"])).is_err());
    }
}
