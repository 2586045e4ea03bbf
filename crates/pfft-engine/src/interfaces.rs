//! Engine interfaces.

use std::io;
use std::time::Duration;

use pfft_core::Spectrum;
use pfft_shmem::CommSnapshot;

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The computed coefficients.
    pub spectrum: Spectrum,
    /// Number of transform points after padding.
    pub points: usize,
    /// Ranks in the world, coordinator included.
    pub ranks: usize,
    /// Butterfly stages executed.
    pub stages: u32,
    /// Stage loop time measured by the coordinator.
    pub duration: Duration,
    /// Communication counters per rank, in rank order.
    pub stats: Vec<CommSnapshot>,
    /// Scaled deviation from the reference transform, when verified.
    pub deviation: Option<f64>,
}

impl TransformResult {
    /// Counters summed over all ranks.
    #[must_use]
    pub fn total_stats(&self) -> CommSnapshot {
        self.stats
            .iter()
            .fold(CommSnapshot::default(), |acc, s| acc.merged(*s))
    }
}

/// Renders a transform result.
pub trait SpectrumPresenter: Send + Sync {
    /// Write `result` to `out`.
    fn present(&self, result: &TransformResult, out: &mut dyn io::Write) -> io::Result<()>;
}
