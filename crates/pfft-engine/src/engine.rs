//! The rank program and its driver.
//!
//! Every rank runs the same program. The coordinator (rank 0) seeds the
//! shared arrays in bit-reversed order and broadcasts their handles; every
//! rank then walks the stage schedule, computing butterflies over its own
//! partition. The coordinator owns no partition but joins both barriers of
//! each stage, and after the last stage it snapshots the arrays into a
//! [`Spectrum`].

use std::borrow::Cow;
use std::time::{Duration, Instant};

use pfft_core::layout::pad_to_power_of_two;
use pfft_core::partition::validate_cover;
use pfft_core::reference::verify;
use pfft_core::{seed_order, FftError, Layout, PartitionPlanner, Role, RunOptions, Spectrum};
use pfft_shmem::{CancelHandle, CommSnapshot, GlobalArray, Pe, World, WorldConfig};
use tracing::{debug, debug_span, info};

use crate::interfaces::TransformResult;
use crate::observer::{NoOpStageObserver, StageObserver};
use crate::phase::SignalAccess;
use crate::stage::StageSchedule;

/// Handles of the shared signal, broadcast by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalHandles {
    /// Real parts, length `input_size`.
    pub real: GlobalArray<f64>,
    /// Imaginary parts, length `input_size`.
    pub imag: GlobalArray<f64>,
    /// Shared array length, `points + 1`.
    pub input_size: usize,
}

struct RankOutcome {
    stages: u32,
    duration: Duration,
    spectrum: Option<Spectrum>,
    stats: CommSnapshot,
}

/// A world of ranks ready to run transforms.
///
/// A run that fails poisons the world; build a new engine afterwards.
pub struct Engine {
    world: World,
    options: RunOptions,
}

impl Engine {
    /// Validate `options` and create the world.
    pub fn new(options: RunOptions) -> Result<Self, FftError> {
        let options = options.normalize();
        options.validate()?;
        let config = WorldConfig::new(options.ranks)
            .with_timeout(options.sync_timeout)
            .with_pinning(options.pin_cores);
        Ok(Self {
            world: World::new(config)?,
            options,
        })
    }

    /// The normalized options.
    #[must_use]
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Handle that aborts a running transform.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.world.cancel_handle()
    }

    /// Transform `samples`, reporting stages to `observer`.
    pub fn execute(
        &self,
        samples: &[f64],
        observer: &dyn StageObserver,
    ) -> Result<TransformResult, FftError> {
        let samples: Cow<'_, [f64]> = if self.options.pad {
            Cow::Owned(pad_to_power_of_two(samples.to_vec()))
        } else {
            Cow::Borrowed(samples)
        };
        let layout = Layout::for_points(samples.len())?;
        let planner =
            PartitionPlanner::new(self.options.workers(), layout.points, self.options.remainder)?;
        validate_cover(&planner.partitions()?, layout.points)?;
        debug!(
            points = layout.points,
            stages = layout.stages,
            ranks = self.options.ranks,
            policy = %self.options.remainder,
            "starting transform"
        );

        let outcomes = self
            .world
            .launch(|pe| rank_program(pe, &samples, &planner, observer))?;

        let mut spectrum = None;
        let mut duration = Duration::ZERO;
        let mut stages = 0;
        let mut stats = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            if let Some(result) = outcome.spectrum {
                spectrum = Some(result);
                duration = outcome.duration;
                stages = outcome.stages;
            }
            stats.push(outcome.stats);
        }
        let spectrum = spectrum.ok_or_else(|| {
            FftError::Comm(pfft_shmem::ShmemError::Poisoned(
                "coordinator returned no spectrum".into(),
            ))
        })?;

        let deviation = if self.options.verify {
            Some(verify(&spectrum, &samples, self.options.tolerance)?)
        } else {
            None
        };

        info!(
            points = layout.points,
            stages,
            ranks = self.options.ranks,
            duration_ms = duration.as_secs_f64() * 1e3,
            "transform complete"
        );
        Ok(TransformResult {
            spectrum,
            points: layout.points,
            ranks: self.options.ranks,
            stages,
            duration,
            stats,
            deviation,
        })
    }
}

/// Transform `samples` with a fresh engine and no observer.
pub fn execute(samples: &[f64], options: &RunOptions) -> Result<TransformResult, FftError> {
    Engine::new(options.clone())?.execute(samples, &NoOpStageObserver)
}

fn rank_program(
    pe: &Pe<'_>,
    samples: &[f64],
    planner: &PartitionPlanner,
    observer: &dyn StageObserver,
) -> Result<RankOutcome, FftError> {
    let role = Role::from_rank(pe.rank());
    let span = debug_span!("transform", role = role.label(), rank = pe.rank());
    let _enter = span.enter();

    let signal = if role.is_coordinator() {
        let handles = seed(pe, samples)?;
        pe.broadcast(Some(handles), Role::COORDINATOR_RANK)?
    } else {
        pe.broadcast(None, Role::COORDINATOR_RANK)?
    };
    let layout = Layout::for_points(signal.input_size.saturating_sub(1))?;

    // Readers pin both segments before the barrier, so the coordinator may
    // free them after the last stage even when there are no stage barriers.
    let partition = planner.plan(role)?;
    let access = SignalAccess::new(pe, &signal, partition)?;
    debug!(offset = partition.offset, count = partition.count, "partition bound");

    pe.barrier()?;
    let started = Instant::now();

    let mut stages = 0;
    for stage in StageSchedule::new(layout.stages) {
        observer.on_stage_start(role, stage);
        let report = access.begin(stage).compute()?.seal()?.commit()?;
        observer.on_stage_complete(&report);
        stages += 1;
    }
    let duration = started.elapsed();

    let spectrum = if role.is_coordinator() {
        let real = pe.local(signal.real)?;
        let imag = pe.local(signal.imag)?;
        pe.free(signal.real)?;
        pe.free(signal.imag)?;
        Some(Spectrum::from_shared(&real, &imag)?)
    } else {
        None
    };

    Ok(RankOutcome {
        stages,
        duration,
        spectrum,
        stats: pe.stats(),
    })
}

/// Allocate both arrays on the coordinator and write the seeded samples.
fn seed(pe: &Pe<'_>, samples: &[f64]) -> Result<SignalHandles, FftError> {
    let layout = Layout::for_points(samples.len())?;
    let seeded = seed_order(samples)?;
    let real = pe.allocate::<f64>(layout.input_size)?;
    let imag = pe.allocate::<f64>(layout.input_size)?;
    pe.writer(real, 0..layout.input_size)?.rput_range(0, &seeded)?;
    debug!(input_size = layout.input_size, "seeded shared arrays");
    Ok(SignalHandles {
        real,
        imag,
        input_size: layout.input_size,
    })
}
