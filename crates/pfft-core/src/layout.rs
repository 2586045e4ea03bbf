//! Shape of one transform: points, shared array length, stage count.

use crate::constants::MAX_POINTS;
use crate::error::FftError;

/// Sizes derived from the number of input samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Number of transform points `L` (a power of two).
    pub points: usize,
    /// Length of the shared arrays, `L + 1` (slot 0 is the sentinel).
    pub input_size: usize,
    /// Number of butterfly stages, `log2(L)`.
    pub stages: u32,
}

impl Layout {
    /// Layout for `points` samples.
    pub fn for_points(points: usize) -> Result<Self, FftError> {
        if points == 0 {
            return Err(FftError::InvalidInput("input sequence is empty".into()));
        }
        if !points.is_power_of_two() {
            return Err(FftError::Config(format!(
                "transform size {points} is not a power of two (use --pad)"
            )));
        }
        if points > MAX_POINTS {
            return Err(FftError::Config(format!(
                "transform size {points} exceeds the maximum of {MAX_POINTS}"
            )));
        }
        Ok(Self {
            points,
            input_size: points + 1,
            stages: points.trailing_zeros(),
        })
    }
}

/// Zero-pad `samples` to the next power of two.
#[must_use]
pub fn pad_to_power_of_two(mut samples: Vec<f64>) -> Vec<f64> {
    if !samples.is_empty() {
        let target = samples.len().next_power_of_two();
        samples.resize(target, 0.0);
    }
    samples
}
