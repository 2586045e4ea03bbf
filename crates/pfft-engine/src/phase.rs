//! The two-barrier protocol of one stage as typestate objects.
//!
//! A stage moves through `ComputePhase -> ComputedStage -> CommitPhase`.
//! Between computing and committing every rank passes a barrier, so no rank
//! overwrites a value another rank still has to read. A second barrier after
//! the commit makes the stage's writes visible before the next stage reads.

use std::time::{Duration, Instant};

use num_complex::Complex64;
use pfft_core::{FftError, Partition, Role};
use pfft_shmem::{ArrayReader, PartitionWriter, Pe};
use tracing::trace;

use crate::engine::SignalHandles;
use crate::stage::{Butterfly, Stage};

/// Read and write capabilities of one rank over the shared signal.
pub struct SignalAccess<'pe> {
    pe: &'pe Pe<'pe>,
    role: Role,
    partition: Partition,
    real: ArrayReader<'pe, f64>,
    imag: ArrayReader<'pe, f64>,
    real_out: PartitionWriter<'pe, f64>,
    imag_out: PartitionWriter<'pe, f64>,
}

impl<'pe> SignalAccess<'pe> {
    /// Bind readers over both arrays and writers over `partition`.
    pub fn new(
        pe: &'pe Pe<'pe>,
        signal: &SignalHandles,
        partition: Partition,
    ) -> Result<Self, FftError> {
        let owned = partition.global_indices();
        Ok(Self {
            pe,
            role: Role::from_rank(pe.rank()),
            partition,
            real: pe.reader(signal.real)?,
            imag: pe.reader(signal.imag)?,
            real_out: pe.writer(signal.real, owned.clone())?,
            imag_out: pe.writer(signal.imag, owned)?,
        })
    }

    /// Start `stage`.
    #[must_use]
    pub fn begin(&self, stage: Stage) -> ComputePhase<'_> {
        ComputePhase {
            access: self,
            stage,
            started: Instant::now(),
        }
    }

    fn load(&self, index: usize) -> Result<Complex64, FftError> {
        Ok(Complex64::new(self.real.rget(index)?, self.imag.rget(index)?))
    }
}

/// A stage whose butterflies have not been computed yet.
pub struct ComputePhase<'a> {
    access: &'a SignalAccess<'a>,
    stage: Stage,
    started: Instant,
}

impl<'a> ComputePhase<'a> {
    /// Compute the butterflies of the owned partition into local buffers.
    pub fn compute(self) -> Result<ComputedStage<'a>, FftError> {
        let access = self.access;
        let indices = access.partition.global_indices();
        let mut real = Vec::with_capacity(indices.len());
        let mut imag = Vec::with_capacity(indices.len());
        for b in indices {
            let fly = Butterfly::at(b, self.stage.span);
            let value = fly.combine(access.load(fly.odd)?, access.load(fly.even)?);
            real.push(value.re);
            imag.push(value.im);
        }
        trace!(
            stage = self.stage.index,
            div = self.stage.span,
            points = real.len(),
            "butterflies computed"
        );
        Ok(ComputedStage {
            access,
            stage: self.stage,
            started: self.started,
            real,
            imag,
        })
    }
}

/// Butterfly results held locally until every rank has finished reading.
pub struct ComputedStage<'a> {
    access: &'a SignalAccess<'a>,
    stage: Stage,
    started: Instant,
    real: Vec<f64>,
    imag: Vec<f64>,
}

impl<'a> ComputedStage<'a> {
    /// Wait until every rank has computed this stage.
    pub fn seal(self) -> Result<CommitPhase<'a>, FftError> {
        self.access.pe.barrier()?;
        Ok(CommitPhase {
            access: self.access,
            stage: self.stage,
            started: self.started,
            real: self.real,
            imag: self.imag,
        })
    }
}

/// A sealed stage ready to publish its results.
pub struct CommitPhase<'a> {
    access: &'a SignalAccess<'a>,
    stage: Stage,
    started: Instant,
    real: Vec<f64>,
    imag: Vec<f64>,
}

impl CommitPhase<'_> {
    /// Write the buffers into the owned indices, then wait for every rank.
    pub fn commit(self) -> Result<StageReport, FftError> {
        let access = self.access;
        let start = access.partition.offset + 1;
        access.real_out.rput_range(start, &self.real)?;
        access.imag_out.rput_range(start, &self.imag)?;
        access.pe.barrier()?;
        Ok(StageReport {
            stage: self.stage,
            rank: access.pe.rank(),
            role: access.role,
            points: self.real.len(),
            elapsed: self.started.elapsed(),
        })
    }
}

/// Outcome of one stage on one rank.
#[derive(Debug, Clone)]
pub struct StageReport {
    /// The completed stage.
    pub stage: Stage,
    /// Rank that ran it.
    pub rank: usize,
    /// Role of that rank.
    pub role: Role,
    /// Butterflies computed.
    pub points: usize,
    /// Time from the start of the stage to the commit barrier.
    pub elapsed: Duration,
}
