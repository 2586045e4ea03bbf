//! Stage observers.

use std::sync::atomic::{AtomicU64, Ordering};

use pfft_core::Role;
use tracing::debug;

use crate::phase::StageReport;
use crate::stage::Stage;

/// Receives stage events from every rank.
pub trait StageObserver: Send + Sync {
    /// A rank is about to compute `stage`.
    fn on_stage_start(&self, _role: Role, _stage: Stage) {}

    /// A rank has passed the commit barrier of a stage.
    fn on_stage_complete(&self, report: &StageReport);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStageObserver;

impl NoOpStageObserver {
    /// Create a new no-op observer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StageObserver for NoOpStageObserver {
    fn on_stage_complete(&self, _report: &StageReport) {}
}

/// Observer that logs each completed stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn on_stage_complete(&self, report: &StageReport) {
        debug!(
            role = report.role.label(),
            rank = report.rank,
            stage = report.stage.index,
            points = report.points,
            elapsed_us = u64::try_from(report.elapsed.as_micros()).unwrap_or(u64::MAX),
            "stage complete"
        );
    }
}

/// Observer counting completed stages.
#[derive(Debug, Default)]
pub struct StageCounter {
    coordinator: AtomicU64,
    total: AtomicU64,
}

impl StageCounter {
    /// Create a counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages completed by the coordinator.
    #[must_use]
    pub fn coordinator_stages(&self) -> u64 {
        self.coordinator.load(Ordering::Relaxed)
    }

    /// Stage completions summed over all ranks.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl StageObserver for StageCounter {
    fn on_stage_complete(&self, report: &StageReport) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if report.role.is_coordinator() {
            self.coordinator.fetch_add(1, Ordering::Relaxed);
        }
    }
}
