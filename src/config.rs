//! Runtime configuration for the vanity search.

use core::ops::RangeInclusive;

use clap::Parser;

use crate::errors::{Error, Result};
use crate::onion::Pattern;

/// Modulus size of the keys mined by default.
pub const DEFAULT_KEY_BITS: usize = 1024;

/// Smallest modulus the search accepts. Every candidate exponent must stay
/// below the modulus.
pub const MIN_KEY_BITS: usize = 128;

/// Smallest public exponent tried for each prime pair.
pub const MIN_EXPONENT: u64 = 0x10001;

/// Largest public exponent tried for each prime pair.
pub const MAX_EXPONENT: u64 = 0xFFFF_FFFF;

/// Parameters of one search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Modulus size of the generated keys; primes have half as many bits.
    pub key_bits: usize,
    /// Public exponents tried for every accepted prime pair.
    pub exponents: RangeInclusive<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            workers: num_cpus::get(),
            key_bits: DEFAULT_KEY_BITS,
            exponents: MIN_EXPONENT..=MAX_EXPONENT,
        }
    }
}

impl SearchConfig {
    /// Default configuration with `workers` threads.
    pub fn with_workers(workers: usize) -> Self {
        SearchConfig {
            workers,
            ..Default::default()
        }
    }

    /// Checks the configuration before any worker is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("at least one worker is required".into()));
        }
        if self.key_bits < MIN_KEY_BITS {
            return Err(Error::InvalidConfig(format!(
                "key size must be at least {} bits",
                MIN_KEY_BITS
            )));
        }
        if self.exponents.is_empty() || *self.exponents.start() < 3 {
            return Err(Error::InvalidConfig(
                "exponent range must be non-empty and start at 3 or above".into(),
            ));
        }
        Ok(())
    }
}

/// Vanity onion address miner
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address prefix to search for (base32 characters: a-z, 2-7)
    pub pattern: String,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Modulus size of the generated key in bits
    #[arg(short = 'b', long, default_value_t = DEFAULT_KEY_BITS)]
    pub bits: usize,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the pattern and search parameters.
    pub fn validate(&self) -> Result<(Pattern, SearchConfig)> {
        let pattern = Pattern::new(&self.pattern)?;
        let search = SearchConfig {
            workers: self.worker_count(),
            key_bits: self.bits,
            ..Default::default()
        };
        search.validate()?;
        Ok((pattern, search))
    }
}
