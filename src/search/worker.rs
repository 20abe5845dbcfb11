//! A single search worker.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;

use super::SearchOutcome;
use crate::algorithms::generate::{compute_private_exponent, PrimePool};
use crate::key::KeyPair;
use crate::onion::{onion_address, Pattern};

/// Runs the search loop of one worker thread.
pub(crate) struct Worker {
    /// Worker ID
    id: usize,
    /// Prefix to look for
    pattern: Pattern,
    /// Modulus size of generated keys
    key_bits: usize,
    /// Public exponents tried for every prime pair
    exponents: RangeInclusive<u64>,
    /// Channel to send the outcome
    result_tx: Sender<SearchOutcome>,
    /// Set by the first worker that finds a match
    stop_flag: Arc<AtomicBool>,
    /// Per-worker interrupt flags, indexed by worker ID
    interrupts: Arc<Vec<AtomicBool>>,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        pattern: Pattern,
        key_bits: usize,
        exponents: RangeInclusive<u64>,
        result_tx: Sender<SearchOutcome>,
        stop_flag: Arc<AtomicBool>,
        interrupts: Arc<Vec<AtomicBool>>,
    ) -> Self {
        Worker {
            id,
            pattern,
            key_bits,
            exponents,
            result_tx,
            stop_flag,
            interrupts,
        }
    }

    /// Searches until a match, a match by another worker, or an interrupt,
    /// then sends exactly one outcome.
    pub(crate) fn run<R: CryptoRngCore + ?Sized>(self, rng: &mut R) {
        log::debug!("worker {} started", self.id);
        let outcome = self.search(rng);
        log::debug!(
            "worker {} exiting after {} trials",
            self.id,
            outcome.trials
        );

        // the engine may already be gone if it was dropped without waiting
        let _ = self.result_tx.send(outcome);
    }

    fn should_stop(&self) -> bool {
        if self.stop_flag.load(Ordering::Acquire) {
            return true;
        }
        if self.interrupts[self.id].load(Ordering::Acquire) {
            log::warn!("worker {} interrupted", self.id);
            return true;
        }
        false
    }

    fn search<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> SearchOutcome {
        let mut trials = 0u64;

        let mut pool = match PrimePool::new(self.key_bits / 2) {
            Ok(pool) => pool,
            Err(err) => {
                log::error!("worker {} cannot generate primes: {}", self.id, err);
                return SearchOutcome::no_match(self.id, trials);
            }
        };

        loop {
            if self.should_stop() {
                return SearchOutcome::no_match(self.id, trials);
            }

            let pairs = match pool.next_pairs(rng) {
                Ok(pairs) => pairs,
                Err(err) => {
                    log::error!("worker {} cannot generate primes: {}", self.id, err);
                    return SearchOutcome::no_match(self.id, trials);
                }
            };
            log::trace!(
                "worker {} drew prime #{}, {} new pairs",
                self.id,
                pool.len(),
                pairs.len()
            );

            for pair in &pairs {
                for exponent in self.exponents.clone() {
                    if self.should_stop() {
                        return SearchOutcome::no_match(self.id, trials);
                    }
                    trials += 1;

                    let e = BigUint::from(exponent);
                    let address = match onion_address(&pair.n, &e) {
                        Ok(address) => address,
                        Err(err) => {
                            log::warn!("worker {} skipped exponent {}: {}", self.id, exponent, err);
                            continue;
                        }
                    };
                    if !self.pattern.matches(&address) {
                        continue;
                    }

                    // the address matches but e has no inverse mod the totient
                    let d = match compute_private_exponent(&e, &pair.totient) {
                        Some(d) => d,
                        None => continue,
                    };

                    self.stop_flag.store(true, Ordering::Release);
                    log::info!(
                        "worker {} found {} after {} trials",
                        self.id,
                        address,
                        trials
                    );

                    let key = KeyPair::from_parts_unchecked(
                        pair.n.clone(),
                        e,
                        d,
                        pair.p.clone(),
                        pair.q.clone(),
                    );
                    return SearchOutcome {
                        worker: self.id,
                        trials,
                        address: Some(address),
                        key: Some(key),
                    };
                }
            }
        }
    }
}
