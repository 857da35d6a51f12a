//! Background persistence.
//!
//! `submit_*` only enqueues; a dedicated thread drains the queue, keeps the
//! newest snapshot when several are pending, and retries recoverable sink
//! failures with jittered exponential backoff. A failed save never reaches
//! the scorer.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::error::SaveError;
use super::format::MatchRecord;
use super::sink::SummarySink;
use crate::config::RetryPolicy;
use crate::engine::MatchSnapshot;

enum Job {
    Snapshot(MatchSnapshot),
    Record(MatchRecord),
}

/// Counters reported when the worker shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub records_stored: u32,
    pub snapshots_published: u32,
    /// Snapshots dropped because a newer one was already queued
    pub snapshots_coalesced: u32,
    pub retries: u32,
    pub failures: u32,
}

pub struct PersistenceWorker {
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl PersistenceWorker {
    pub fn spawn(sink: Arc<dyn SummarySink>, policy: RetryPolicy, seed: u64) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("cricket-persistence".to_string())
            .spawn(move || run(receiver, sink, policy, ChaCha8Rng::seed_from_u64(seed)))
            .map_err(|e| log::warn!("Persistence worker failed to start: {e}"))
            .ok();
        Self { sender: handle.as_ref().map(|_| sender), handle }
    }

    pub fn submit_snapshot(&self, snapshot: MatchSnapshot) {
        self.send(Job::Snapshot(snapshot));
    }

    pub fn submit_record(&self, record: MatchRecord) {
        self.send(Job::Record(record));
    }

    fn send(&self, job: Job) {
        let delivered = self.sender.as_ref().is_some_and(|tx| tx.send(job).is_ok());
        if !delivered {
            log::warn!("Persistence worker is not running; job dropped");
        }
    }

    /// Drains the queue and waits for the thread.
    pub fn shutdown(mut self) -> WorkerStats {
        self.stop()
    }

    fn stop(&mut self) -> WorkerStats {
        self.sender.take();
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                log::warn!("Persistence worker panicked");
                WorkerStats::default()
            }
            None => WorkerStats::default(),
        }
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    receiver: Receiver<Job>,
    sink: Arc<dyn SummarySink>,
    policy: RetryPolicy,
    mut rng: ChaCha8Rng,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while let Ok(first) = receiver.recv() {
        let mut records = Vec::new();
        let mut latest_snapshot = None;
        for job in std::iter::once(first).chain(receiver.try_iter()) {
            match job {
                Job::Record(record) => records.push(record),
                Job::Snapshot(snapshot) => {
                    if latest_snapshot.replace(snapshot).is_some() {
                        stats.snapshots_coalesced += 1;
                    }
                }
            }
        }

        for record in records {
            let outcome = with_retry(&policy, &mut rng, &mut stats, "store summary", || {
                sink.store_summary(&record)
            });
            match outcome {
                Ok(()) => stats.records_stored += 1,
                Err(e) => {
                    stats.failures += 1;
                    log::warn!("Giving up on summary for match {}: {e}", record.match_id);
                }
            }
        }

        if let Some(snapshot) = latest_snapshot {
            let outcome = with_retry(&policy, &mut rng, &mut stats, "publish snapshot", || {
                sink.publish_snapshot(&snapshot)
            });
            match outcome {
                Ok(()) => stats.snapshots_published += 1,
                Err(e) => {
                    stats.failures += 1;
                    log::warn!("Dropping snapshot {}: {e}", snapshot.sequence);
                }
            }
        }
    }

    log::debug!("Persistence worker stopped: {stats:?}");
    stats
}

fn with_retry(
    policy: &RetryPolicy,
    rng: &mut impl RngCore,
    stats: &mut WorkerStats,
    what: &str,
    mut op: impl FnMut() -> Result<(), SaveError>,
) -> Result<(), SaveError> {
    let mut backoff = Duration::from_millis(policy.initial_backoff_ms);
    let max_backoff = Duration::from_millis(policy.max_backoff_ms);
    let mut attempt = 1;

    loop {
        match op() {
            Ok(()) => return Ok(()),
            Err(e) if e.is_recoverable() && attempt < policy.max_attempts => {
                let delay = jittered_backoff(&mut *rng, backoff);
                log::warn!("Failed to {what} (attempt {attempt}): {e}; retrying in {delay:?}");
                thread::sleep(delay);
                stats.retries += 1;
                attempt += 1;
                backoff = backoff.saturating_mul(2).min(max_backoff);
            }
            Err(e) => return Err(e),
        }
    }
}

/// "Equal jitter": the delay is in `[backoff/2, backoff]`.
pub(crate) fn jittered_backoff(rng: &mut impl RngCore, backoff: Duration) -> Duration {
    let backoff_ms = backoff.as_millis() as u64;
    if backoff_ms <= 1 {
        return backoff;
    }

    let half_ms = backoff_ms / 2;
    let jitter_ms = rng.gen_range(0..=half_ms);
    Duration::from_millis(half_ms.saturating_add(jitter_ms))
}
