//! SPMD world: rank launch, shared heap, barrier and broadcast.
//!
//! Since global mutable state is a dangerous idea, every rank receives a
//! [`Pe`] context and passes it to whatever needs the heap or a collective.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};

use crate::barrier::{BarrierWait, PhaseBarrier};
use crate::element::Element;
use crate::error::ShmemError;
use crate::global_array::{ArrayReader, GlobalArray, PartitionWriter, Segment, SegmentId};
use crate::stats::{CommSnapshot, CommStats};

/// Granularity of poison checks while waiting for a broadcast.
const BROADCAST_POLL: Duration = Duration::from_millis(10);

type Payload = Box<dyn Any + Send>;

/// Launch configuration of a world.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Number of ranks launched together.
    pub ranks: usize,
    /// Bound on every barrier and broadcast wait.
    pub sync_timeout: Duration,
    /// Pin rank threads to CPU cores (best effort).
    pub pin_cores: bool,
}

impl WorldConfig {
    /// Configuration for `ranks` ranks with default timeout and no pinning.
    #[must_use]
    pub fn new(ranks: usize) -> Self {
        Self {
            ranks,
            ..Self::default()
        }
    }

    /// Set the synchronisation timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = timeout;
        self
    }

    /// Enable or disable core pinning.
    #[must_use]
    pub fn with_pinning(mut self, pin: bool) -> Self {
        self.pin_cores = pin;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ranks: 1,
            sync_timeout: Duration::from_secs(30),
            pin_cores: false,
        }
    }
}

struct Mailbox {
    tx: Sender<Payload>,
    rx: Receiver<Payload>,
}

struct Shared {
    heap: RwLock<HashMap<SegmentId, Arc<Segment>>>,
    next_segment: AtomicU64,
    barrier: PhaseBarrier,
    mailboxes: Vec<Mailbox>,
    failed_rank: Mutex<Option<usize>>,
}

/// Cloneable handle that aborts a running world from outside.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<Shared>,
}

impl CancelHandle {
    /// Poison the world with [`ShmemError::Cancelled`].
    pub fn cancel(&self) {
        self.shared.barrier.poison(ShmemError::Cancelled);
    }

    /// Whether the world has been cancelled or has otherwise failed.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.shared.barrier.poisoned().is_some()
    }
}

/// A fixed group of ranks sharing one heap.
pub struct World {
    config: WorldConfig,
    shared: Arc<Shared>,
}

impl World {
    /// Create a world for `config.ranks` ranks.
    pub fn new(config: WorldConfig) -> Result<Self, ShmemError> {
        if config.ranks == 0 {
            return Err(ShmemError::EmptyWorld);
        }
        let mailboxes = (0..config.ranks)
            .map(|_| {
                let (tx, rx) = crossbeam_channel::unbounded();
                Mailbox { tx, rx }
            })
            .collect();
        Ok(Self {
            shared: Arc::new(Shared {
                heap: RwLock::new(HashMap::new()),
                next_segment: AtomicU64::new(1),
                barrier: PhaseBarrier::new(config.ranks),
                mailboxes,
                failed_rank: Mutex::new(None),
            }),
            config,
        })
    }

    /// Number of ranks.
    #[must_use]
    pub fn rank_n(&self) -> usize {
        self.config.ranks
    }

    /// Launch configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Handle for cancelling the world from another thread.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of live segments in the heap.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.shared.heap.read().len()
    }

    /// Run `program` on every rank and wait for all of them.
    ///
    /// Returns the per-rank results in rank order. If any rank fails, the
    /// world is poisoned so the others leave their collectives, and the error
    /// of the first failing rank is returned.
    pub fn launch<R, E, F>(&self, program: F) -> Result<Vec<R>, E>
    where
        F: Fn(&Pe<'_>) -> Result<R, E> + Sync,
        R: Send,
        E: From<ShmemError> + fmt::Display + Send,
    {
        let cores = if self.config.pin_cores {
            core_affinity::get_core_ids()
        } else {
            None
        };

        let outcomes: Vec<Result<R, E>> = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.config.ranks)
                .map(|rank| {
                    let program = &program;
                    let cores = cores.as_deref();
                    scope.spawn(move |_| self.run_rank(rank, cores, program))
                })
                .collect();
            handles
                .into_iter()
                .enumerate()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(E::from(ShmemError::RankPanicked(rank))))
                })
                .collect()
        })
        .map_err(|_| E::from(ShmemError::Poisoned("rank scope panicked".into())))?;

        let primary = *self.shared.failed_rank.lock();
        let mut results = Vec::with_capacity(outcomes.len());
        let mut errors = Vec::new();
        for (rank, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(value) => results.push(value),
                Err(err) => errors.push((rank, err)),
            }
        }
        if errors.is_empty() {
            return Ok(results);
        }
        let index = errors
            .iter()
            .position(|(rank, _)| Some(*rank) == primary)
            .unwrap_or(0);
        Err(errors.swap_remove(index).1)
    }

    fn run_rank<R, E, F>(
        &self,
        rank: usize,
        cores: Option<&[core_affinity::CoreId]>,
        program: &F,
    ) -> Result<R, E>
    where
        F: Fn(&Pe<'_>) -> Result<R, E>,
        E: fmt::Display,
    {
        if let Some(cores) = cores.filter(|c| !c.is_empty()) {
            let core = cores[rank % cores.len()];
            if !core_affinity::set_for_current(core) {
                tracing::debug!(rank, core = core.id, "could not pin rank to core");
            }
        }

        let span = tracing::debug_span!("rank", rank);
        let _enter = span.enter();

        let pe = Pe {
            rank,
            world: self,
            stats: CommStats::new(),
        };
        let _guard = PoisonOnPanic {
            rank,
            shared: &self.shared,
        };
        let outcome = program(&pe);
        if let Err(err) = &outcome {
            self.fail(rank, format!("rank {rank}: {err}"));
        }
        outcome
    }

    fn fail(&self, rank: usize, message: String) {
        {
            let mut failed = self.shared.failed_rank.lock();
            if failed.is_none() {
                *failed = Some(rank);
            }
        }
        tracing::debug!(rank, %message, "rank failed, poisoning world");
        self.shared.barrier.poison(ShmemError::Poisoned(message));
    }
}

struct PoisonOnPanic<'a> {
    rank: usize,
    shared: &'a Shared,
}

impl Drop for PoisonOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            {
                let mut failed = self.shared.failed_rank.lock();
                if failed.is_none() {
                    *failed = Some(self.rank);
                }
            }
            self.shared
                .barrier
                .poison(ShmemError::RankPanicked(self.rank));
        }
    }
}

/// Per-rank context: identity, heap access and collectives.
pub struct Pe<'w> {
    rank: usize,
    world: &'w World,
    stats: CommStats,
}

impl Pe<'_> {
    /// This rank.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of ranks in the world.
    #[must_use]
    pub fn rank_n(&self) -> usize {
        self.world.config.ranks
    }

    /// Snapshot of this rank's communication counters.
    #[must_use]
    pub fn stats(&self) -> CommSnapshot {
        self.stats.snapshot()
    }

    /// Collective barrier across all ranks.
    pub fn barrier(&self) -> Result<BarrierWait, ShmemError> {
        let wait = self
            .world
            .shared
            .barrier
            .wait(self.rank, self.world.config.sync_timeout)?;
        self.stats.record_barrier();
        tracing::trace!(rank = self.rank, generation = wait.generation, "barrier passed");
        Ok(wait)
    }

    /// Allocate `len` zeroed elements owned by this rank.
    pub fn allocate<T: Element>(&self, len: usize) -> Result<GlobalArray<T>, ShmemError> {
        if len == 0 {
            return Err(ShmemError::ZeroLength);
        }
        let id = SegmentId(self.world.shared.next_segment.fetch_add(1, Ordering::Relaxed));
        self.world
            .shared
            .heap
            .write()
            .insert(id, Arc::new(Segment::new(self.rank, len)));
        tracing::debug!(rank = self.rank, segment = id.raw(), len, "allocated segment");
        Ok(GlobalArray::new(self.rank, id, len))
    }

    /// Release a segment owned by this rank.
    pub fn free<T: Element>(&self, handle: GlobalArray<T>) -> Result<(), ShmemError> {
        self.check_owner(handle)?;
        self.world.shared.heap.write().remove(&handle.segment());
        Ok(())
    }

    /// Collective broadcast: every rank returns the value supplied by `root`.
    ///
    /// Only the root's `value` is used; other ranks pass `None`.
    pub fn broadcast<T>(&self, value: Option<T>, root: usize) -> Result<T, ShmemError>
    where
        T: Clone + Send + 'static,
    {
        let rank_n = self.rank_n();
        if root >= rank_n {
            return Err(ShmemError::BadRoot { root, rank_n });
        }
        self.stats.record_broadcast();

        let shared = &self.world.shared;
        if self.rank == root {
            let value = value.ok_or(ShmemError::MissingPayload(root))?;
            for (rank, mailbox) in shared.mailboxes.iter().enumerate() {
                if rank != root {
                    mailbox
                        .tx
                        .send(Box::new(value.clone()))
                        .map_err(|_| ShmemError::Poisoned(format!("mailbox of rank {rank} closed")))?;
                }
            }
            return Ok(value);
        }

        let timeout = self.world.config.sync_timeout;
        let deadline = Instant::now() + timeout;
        let rx = &shared.mailboxes[self.rank].rx;
        loop {
            if let Some(err) = shared.barrier.poisoned() {
                return Err(err);
            }
            let now = Instant::now();
            if now >= deadline {
                let err = ShmemError::Timeout {
                    rank: self.rank,
                    op: "broadcast",
                    timeout,
                };
                shared.barrier.poison(err.clone());
                return Err(err);
            }
            match rx.recv_timeout(BROADCAST_POLL.min(deadline - now)) {
                Ok(payload) => {
                    return payload
                        .downcast::<T>()
                        .map(|boxed| *boxed)
                        .map_err(|_| ShmemError::TypeMismatch(self.rank));
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ShmemError::Poisoned("broadcast mailbox closed".into()));
                }
            }
        }
    }

    /// Read capability for `handle`.
    pub fn reader<T: Element>(
        &self,
        handle: GlobalArray<T>,
    ) -> Result<ArrayReader<'_, T>, ShmemError> {
        Ok(ArrayReader::new(handle, self.segment(handle)?, &self.stats))
    }

    /// Write capability for the `owned` indices of `handle`.
    pub fn writer<T: Element>(
        &self,
        handle: GlobalArray<T>,
        owned: Range<usize>,
    ) -> Result<PartitionWriter<'_, T>, ShmemError> {
        PartitionWriter::new(self.rank, handle, owned, self.segment(handle)?, &self.stats)
    }

    /// Full local copy of a segment owned by this rank.
    pub fn local<T: Element>(&self, handle: GlobalArray<T>) -> Result<Vec<T>, ShmemError> {
        let segment = self.check_owner(handle)?;
        segment.load_range(0..segment.len())
    }

    fn segment<T: Element>(&self, handle: GlobalArray<T>) -> Result<Arc<Segment>, ShmemError> {
        self.world
            .shared
            .heap
            .read()
            .get(&handle.segment())
            .cloned()
            .ok_or(ShmemError::UnknownSegment(handle.segment().raw()))
    }

    fn check_owner<T: Element>(&self, handle: GlobalArray<T>) -> Result<Arc<Segment>, ShmemError> {
        let segment = self.segment(handle)?;
        if segment.owner != self.rank {
            return Err(ShmemError::NotLocal {
                rank: self.rank,
                owner: segment.owner,
            });
        }
        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(ranks: usize) -> World {
        World::new(WorldConfig::new(ranks).with_timeout(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn empty_world_rejected() {
        assert!(matches!(
            World::new(WorldConfig::new(0)),
            Err(ShmemError::EmptyWorld)
        ));
    }

    #[test]
    fn ranks_are_unique_and_ordered() {
        let ranks = world(4)
            .launch(|pe| Ok::<_, ShmemError>((pe.rank(), pe.rank_n())))
            .unwrap();
        assert_eq!(ranks, vec![(0, 4), (1, 4), (2, 4), (3, 4)]);
    }

    #[test]
    fn broadcast_handle_then_remote_read() {
        let values = world(3)
            .launch(|pe| {
                let handle = if pe.rank() == 0 {
                    let handle = pe.allocate::<f64>(3)?;
                    let writer = pe.writer(handle, 0..3)?;
                    writer.rput_range(0, &[1.0, 2.0, 3.0])?;
                    Some(handle)
                } else {
                    None
                };
                let handle = pe.broadcast(handle, 0)?;
                pe.barrier()?;
                pe.reader(handle)?.rget(pe.rank())
            })
            .unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_length_allocation_fails() {
        let err = world(1)
            .launch(|pe| pe.allocate::<u64>(0).map(|_| ()))
            .unwrap_err();
        assert_eq!(err, ShmemError::ZeroLength);
    }

    #[test]
    fn local_requires_ownership() {
        let err: ShmemError = world(2)
            .launch(|pe| {
                let handle = pe.broadcast(
                    if pe.rank() == 0 {
                        Some(pe.allocate::<u64>(2)?)
                    } else {
                        None
                    },
                    0,
                )?;
                pe.barrier()?;
                if pe.rank() == 1 {
                    pe.local(handle)?;
                }
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, ShmemError::NotLocal { rank: 1, owner: 0 });
    }

    #[test]
    fn failing_rank_poisons_others() {
        let err = world(3)
            .launch(|pe| {
                if pe.rank() == 2 {
                    return Err(ShmemError::OutOfBounds { index: 1, len: 0 });
                }
                pe.barrier()?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, ShmemError::OutOfBounds { index: 1, len: 0 });
    }

    #[test]
    fn broadcast_type_mismatch_detected() {
        let err = world(2)
            .launch(|pe| {
                if pe.rank() == 0 {
                    pe.broadcast(Some(7u32), 0).map(|_| ())
                } else {
                    pe.broadcast::<String>(None, 0).map(|_| ())
                }
            })
            .unwrap_err();
        assert_eq!(err, ShmemError::TypeMismatch(1));
    }

    #[test]
    fn bad_root_rejected() {
        let err = world(2)
            .launch(|pe| pe.broadcast(Some(1u8), 5))
            .unwrap_err();
        assert_eq!(err, ShmemError::BadRoot { root: 5, rank_n: 2 });
    }

    #[test]
    fn cancel_releases_barrier() {
        let world = world(2);
        let cancel = world.cancel_handle();
        let err = world
            .launch(|pe| {
                if pe.rank() == 0 {
                    cancel.cancel();
                    return Ok(());
                }
                pe.barrier().map(|_| ())
            })
            .unwrap_err();
        assert_eq!(err, ShmemError::Cancelled);
        assert!(cancel.is_poisoned());
    }

    #[test]
    fn free_releases_segment() {
        let world = world(1);
        world
            .launch(|pe| {
                let handle = pe.allocate::<i64>(4)?;
                pe.free(handle)?;
                assert!(matches!(pe.reader(handle), Err(ShmemError::UnknownSegment(_))));
                Ok::<_, ShmemError>(())
            })
            .unwrap();
        assert_eq!(world.segment_count(), 0);
    }

    #[test]
    fn stats_count_operations() {
        let stats = world(2)
            .launch(|pe| {
                let handle = pe.broadcast(
                    if pe.rank() == 0 {
                        Some(pe.allocate::<u64>(4)?)
                    } else {
                        None
                    },
                    0,
                )?;
                pe.barrier()?;
                let reader = pe.reader(handle)?;
                reader.rget_range(0..4)?;
                Ok::<_, ShmemError>(pe.stats())
            })
            .unwrap();
        for snap in stats {
            assert_eq!(snap.gets, 4);
            assert_eq!(snap.barriers, 1);
            assert_eq!(snap.broadcasts, 1);
        }
    }
}
