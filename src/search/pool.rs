//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use rand_core::OsRng;

use super::worker::Worker;
use super::{SearchOutcome, SearchReport};
use crate::config::SearchConfig;
use crate::errors::Result;
use crate::onion::Pattern;

/// A running vanity search.
///
/// Dropping the search without calling [`VanitySearch::wait`] interrupts
/// every worker and joins the threads.
pub struct VanitySearch {
    /// The pattern being searched for
    pattern: Pattern,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for outcomes
    result_rx: Receiver<SearchOutcome>,
    /// Outcomes already taken off the channel
    collected: Vec<SearchOutcome>,
    /// Set once a worker finds a match
    stop_flag: Arc<AtomicBool>,
    /// Per-worker interrupt flags
    interrupts: Arc<Vec<AtomicBool>>,
    /// Start time
    start_time: Instant,
}

impl VanitySearch {
    /// Spawns `config.workers` threads searching for `pattern`.
    pub fn start(pattern: Pattern, config: SearchConfig) -> Result<VanitySearch> {
        config.validate()?;

        let (result_tx, result_rx) = unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let interrupts: Arc<Vec<AtomicBool>> =
            Arc::new((0..config.workers).map(|_| AtomicBool::new(false)).collect());

        log::debug!(
            "searching for {} with {} workers, {} bit keys (about {:.0} trials)",
            pattern,
            config.workers,
            config.key_bits,
            pattern.estimated_difficulty()
        );

        let mut search = VanitySearch {
            pattern,
            handles: Some(Vec::with_capacity(config.workers)),
            result_rx,
            collected: Vec::new(),
            stop_flag,
            interrupts,
            start_time: Instant::now(),
        };
        search.spawn_workers(&config, result_tx)?;

        Ok(search)
    }

    /// Spawns worker threads. On failure the workers already running are
    /// stopped and joined by `Drop`.
    fn spawn_workers(
        &mut self,
        config: &SearchConfig,
        result_tx: Sender<SearchOutcome>,
    ) -> Result<()> {
        for id in 0..config.workers {
            let worker = Worker::new(
                id,
                self.pattern.clone(),
                config.key_bits,
                config.exponents.clone(),
                result_tx.clone(),
                self.stop_flag.clone(),
                self.interrupts.clone(),
            );

            let handle = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || worker.run(&mut OsRng))?;

            if let Some(handles) = self.handles.as_mut() {
                handles.push(handle);
            }
        }
        // result_tx dropped here so the channel closes when all workers finish
        Ok(())
    }

    /// Asks one worker to stop. Returns false if there is no such worker.
    pub fn interrupt(&self, worker: usize) -> bool {
        match self.interrupts.get(worker) {
            Some(flag) => {
                flag.store(true, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Asks every worker to stop.
    pub fn interrupt_all(&self) {
        self.interrupter().interrupt_all();
    }

    /// Returns a handle that can interrupt the workers from another thread,
    /// e.g. a signal handler.
    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            interrupts: self.interrupts.clone(),
        }
    }

    /// Returns true once some worker has found a match.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.interrupts.len()
    }

    /// Returns the pattern being searched for.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the elapsed time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Waits up to `timeout` for the next worker outcome. The outcome is
    /// also kept for the final report.
    pub fn wait_for_outcome(&mut self, timeout: Duration) -> Option<&SearchOutcome> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.collected.push(outcome);
                self.collected.last()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Blocks until every worker has reported, then aggregates the outcomes.
    ///
    /// A worker that died without reporting is counted with zero trials and
    /// no match.
    pub fn wait(mut self) -> SearchReport {
        let workers = self.num_workers();
        let mut outcomes = core::mem::take(&mut self.collected);

        // recv fails only once every sender is gone
        while outcomes.len() < workers {
            match self.result_rx.recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(_) => break,
            }
        }
        let elapsed = self.elapsed();

        self.join();

        for id in 0..workers {
            if !outcomes.iter().any(|o| o.worker == id) {
                log::error!("worker {} exited without reporting", id);
                outcomes.push(SearchOutcome::no_match(id, 0));
            }
        }

        let report = SearchReport::aggregate(outcomes, elapsed);
        if report.is_inconclusive() {
            log::warn!(
                "search for {} ended without a match after {} trials",
                self.pattern,
                report.total_trials
            );
        }
        report
    }

    fn join(&mut self) {
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let name = handle.thread().name().map(str::to_owned);
                if handle.join().is_err() {
                    log::error!("{} panicked", name.as_deref().unwrap_or("worker"));
                }
            }
        }
    }
}

impl Drop for VanitySearch {
    fn drop(&mut self) {
        if self.handles.is_some() {
            self.interrupt_all();
            self.join();
        }
    }
}

/// Interrupts the workers of a [`VanitySearch`] from any thread.
#[derive(Clone, Debug)]
pub struct Interrupter {
    interrupts: Arc<Vec<AtomicBool>>,
}

impl Interrupter {
    /// Asks every worker to stop.
    pub fn interrupt_all(&self) {
        for flag in self.interrupts.iter() {
            flag.store(true, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(workers: usize) -> SearchConfig {
        SearchConfig {
            workers,
            key_bits: 256,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_interrupt_unknown_worker() {
        let search = VanitySearch::start(Pattern::new("abcdefghijklmnop").unwrap(), config(2))
            .unwrap();
        assert_eq!(search.num_workers(), 2);
        assert!(!search.interrupt(2));
        assert!(search.interrupt(1));
        search.interrupt_all();

        let report = search.wait();
        assert!(report.is_inconclusive());
        assert_eq!(report.outcomes.len(), 2);
    }

    #[test]
    fn test_drop_stops_workers() {
        let search = VanitySearch::start(Pattern::new("abcdefghijklmnop").unwrap(), config(2))
            .unwrap();
        assert!(!search.is_stopped());
        drop(search);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(VanitySearch::start(Pattern::new("a").unwrap(), config(0)).is_err());
    }
}
