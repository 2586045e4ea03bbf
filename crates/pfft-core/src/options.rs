//! Run options and their validation.

use std::time::Duration;

use crate::constants::{DEFAULT_RANKS, DEFAULT_SYNC_TIMEOUT_SECS, DEFAULT_TOLERANCE};
use crate::error::FftError;
use crate::partition::RemainderPolicy;

/// Options for one distributed transform.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Total ranks, coordinator included.
    pub ranks: usize,
    /// Handling of points that do not divide evenly among workers.
    pub remainder: RemainderPolicy,
    /// Bound on every barrier and broadcast wait.
    pub sync_timeout: Duration,
    /// Zero-pad the input to the next power of two.
    pub pad: bool,
    /// Pin rank threads to CPU cores.
    pub pin_cores: bool,
    /// Compare the result with the reference transform.
    pub verify: bool,
    /// Accepted deviation when verifying, relative to the signal's L1 norm.
    pub tolerance: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ranks: DEFAULT_RANKS,
            remainder: RemainderPolicy::default(),
            sync_timeout: Duration::from_secs(DEFAULT_SYNC_TIMEOUT_SECS),
            pad: false,
            pin_cores: false,
            verify: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl RunOptions {
    /// Normalize options, applying defaults where values are unusable.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.sync_timeout.is_zero() {
            self.sync_timeout = Duration::from_secs(DEFAULT_SYNC_TIMEOUT_SECS);
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            self.tolerance = DEFAULT_TOLERANCE;
        }
        self
    }

    /// Number of worker ranks.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.ranks.saturating_sub(1)
    }

    /// Reject configurations that can make no progress.
    pub fn validate(&self) -> Result<(), FftError> {
        if self.workers() == 0 {
            return Err(FftError::Config(format!(
                "{} rank(s) leave no workers: at least two ranks are required",
                self.ranks
            )));
        }
        Ok(())
    }
}
