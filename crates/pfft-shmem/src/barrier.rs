//! Poisonable, generation-counting barrier with bounded waits.
//!
//! Every rank must call [`PhaseBarrier::wait`] once per phase. A wait that
//! exceeds its bound poisons the barrier, so the remaining ranks fail fast
//! instead of blocking forever.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::ShmemError;

/// Outcome of a successful barrier wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWait {
    /// Generation that was completed by this wait.
    pub generation: u64,
}

struct BarrierState {
    arrived: usize,
    generation: u64,
    poison: Option<ShmemError>,
}

/// Collective rendezvous for a fixed number of parties.
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl PhaseBarrier {
    /// Create a barrier for `parties` participants.
    #[must_use]
    pub fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                poison: None,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Block until all parties arrive, the barrier is poisoned, or `timeout`
    /// elapses. A timeout poisons the barrier.
    pub fn wait(&self, rank: usize, timeout: Duration) -> Result<BarrierWait, ShmemError> {
        let mut state = self.state.lock();
        if let Some(err) = &state.poison {
            return Err(err.clone());
        }

        let generation = state.generation;
        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation += 1;
            self.cvar.notify_all();
            return Ok(BarrierWait { generation });
        }

        let deadline = Instant::now() + timeout;
        while state.generation == generation {
            if let Some(err) = &state.poison {
                return Err(err.clone());
            }
            if self.cvar.wait_until(&mut state, deadline).timed_out()
                && state.generation == generation
            {
                let err = ShmemError::Timeout {
                    rank,
                    op: "barrier",
                    timeout,
                };
                tracing::warn!(rank, generation, ?timeout, "barrier wait timed out");
                state.poison.get_or_insert_with(|| err.clone());
                self.cvar.notify_all();
                return Err(err);
            }
        }

        Ok(BarrierWait { generation })
    }

    /// Poison the barrier, waking every waiter with `err`.
    ///
    /// The first poison wins; later calls keep the original cause.
    pub fn poison(&self, err: ShmemError) {
        let mut state = self.state.lock();
        if state.poison.is_none() {
            state.poison = Some(err);
        }
        self.cvar.notify_all();
    }

    /// The poison cause, if any.
    #[must_use]
    pub fn poisoned(&self) -> Option<ShmemError> {
        self.state.lock().poison.clone()
    }
}
