//! Parallel search for keys with a vanity onion address.
//!
//! Every worker owns its own pool of primes and walks the public exponent
//! range for each accepted prime pair. Workers share only a stop flag, set
//! by whichever worker finds a match, and a channel on which each worker
//! sends exactly one [`SearchOutcome`] when it exits.
//!
//! ```no_run
//! use rsa_vanity::onion::Pattern;
//! use rsa_vanity::search::VanitySearch;
//! use rsa_vanity::SearchConfig;
//!
//! let pattern = Pattern::new("ab").unwrap();
//! let report = VanitySearch::start(pattern, SearchConfig::default())
//!     .unwrap()
//!     .wait();
//! if let Some(address) = &report.address {
//!     println!("{}.onion after {} trials", address, report.total_trials);
//! }
//! ```

mod pool;
mod worker;

use std::time::Duration;

use crate::key::KeyPair;

pub use pool::{Interrupter, VanitySearch};

/// What a single worker reports when it stops.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Index of the worker, `0..workers`.
    pub worker: usize,
    /// Number of candidate addresses the worker computed.
    pub trials: u64,
    /// The matching address, if this worker found one.
    pub address: Option<String>,
    /// The key behind `address`.
    pub key: Option<KeyPair>,
}

impl SearchOutcome {
    pub(crate) fn no_match(worker: usize, trials: u64) -> Self {
        SearchOutcome {
            worker,
            trials,
            address: None,
            key: None,
        }
    }

    /// Returns true if this outcome carries a matching key.
    pub fn is_match(&self) -> bool {
        self.key.is_some()
    }
}

/// Aggregate of all worker outcomes of one search.
#[derive(Clone, Debug)]
pub struct SearchReport {
    /// Sum of trials over all workers.
    pub total_trials: u64,
    /// First matching address in collection order.
    pub address: Option<String>,
    /// The key behind `address`.
    pub key: Option<KeyPair>,
    /// One outcome per worker, in the order they were collected.
    pub outcomes: Vec<SearchOutcome>,
    /// Wall time from start to the last collected outcome.
    pub elapsed: Duration,
}

impl SearchReport {
    /// Builds the report from outcomes in collection order.
    ///
    /// The first match collected wins. Any later match is turned into a plain
    /// outcome so that the report carries exactly one key.
    pub(crate) fn aggregate(mut outcomes: Vec<SearchOutcome>, elapsed: Duration) -> Self {
        let total_trials = outcomes.iter().map(|o| o.trials).sum();

        let mut winner: Option<(String, KeyPair)> = None;
        for outcome in outcomes.iter_mut() {
            if !outcome.is_match() {
                continue;
            }
            if winner.is_none() {
                if let (Some(address), Some(key)) = (&outcome.address, &outcome.key) {
                    winner = Some((address.clone(), key.clone()));
                }
            } else {
                log::debug!(
                    "discarding later match {:?} from worker {}",
                    outcome.address,
                    outcome.worker
                );
                outcome.address = None;
                outcome.key = None;
            }
        }

        let (address, key) = match winner {
            Some((address, key)) => (Some(address), Some(key)),
            None => (None, None),
        };

        SearchReport {
            total_trials,
            address,
            key,
            outcomes,
            elapsed,
        }
    }

    /// True when no worker reported a match, which only happens after an
    /// external interruption.
    pub fn is_inconclusive(&self) -> bool {
        self.key.is_none()
    }

    /// Trials per second over the whole search.
    pub fn trials_per_second(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.total_trials as f64 / elapsed
        } else {
            0.0
        }
    }
}
