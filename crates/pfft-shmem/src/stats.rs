//! Atomic per-rank communication counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of one rank's communication counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommSnapshot {
    /// Elements read with one-sided gets.
    pub gets: u64,
    /// Elements written with one-sided puts.
    pub puts: u64,
    /// Barriers passed.
    pub barriers: u64,
    /// Broadcasts taken part in.
    pub broadcasts: u64,
}

impl CommSnapshot {
    /// Sum of two snapshots.
    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        Self {
            gets: self.gets + other.gets,
            puts: self.puts + other.puts,
            barriers: self.barriers + other.barriers,
            broadcasts: self.broadcasts + other.broadcasts,
        }
    }
}

/// Atomic counters for lock-free updates from the hot loop.
#[derive(Debug, Default)]
pub struct CommStats {
    gets: AtomicU64,
    puts: AtomicU64,
    barriers: AtomicU64,
    broadcasts: AtomicU64,
}

impl CommStats {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a snapshot of the counters.
    #[must_use]
    pub fn snapshot(&self) -> CommSnapshot {
        CommSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            barriers: self.barriers.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_gets(&self, n: usize) {
        self.gets.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_puts(&self, n: usize) {
        self.puts.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_barrier(&self) {
        self.barriers.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_broadcast(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }
}
