//! Elapsed-time bookkeeping for the periodic drive.
//!
//! The core owns no clock: the caller reports elapsed wall time through
//! `periodic(elapsed_ms)` and these timers only accumulate it.

use rand::Rng;

/// Randomized election timeout. The effective timeout is drawn from
/// `[base, 2 * base)` on every reset to avoid split votes.
#[derive(Debug)]
pub(crate) struct ElectionTimer {
    base_timeout_ms: u64,
    timeout_ms: u64,
    elapsed_ms: u64,
}

impl ElectionTimer {
    pub(crate) fn new(base_timeout_ms: u64) -> Self {
        Self {
            base_timeout_ms,
            timeout_ms: Self::random_timeout(base_timeout_ms),
            elapsed_ms: 0,
        }
    }

    pub(crate) fn advance(
        &mut self,
        elapsed_ms: u64,
    ) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.elapsed_ms >= self.timeout_ms
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.timeout_ms = Self::random_timeout(self.base_timeout_ms);
    }

    fn random_timeout(base: u64) -> u64 {
        rand::thread_rng().gen_range(base..base * 2)
    }
}

/// Fixed-interval heartbeat timer for leader replication rounds.
#[derive(Debug)]
pub(crate) struct ReplicationTimer {
    interval_ms: u64,
    elapsed_ms: u64,
}

impl ReplicationTimer {
    pub(crate) fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0,
        }
    }

    pub(crate) fn advance(
        &mut self,
        elapsed_ms: u64,
    ) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.elapsed_ms >= self.interval_ms
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}
