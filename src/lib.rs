//! Shared helpers for the workspace integration tests.

use num_complex::Complex64;
use pfft_core::Spectrum;

/// Largest componentwise distance between `spectrum` and `expected`.
///
/// # Panics
///
/// Panics if the lengths differ.
#[must_use]
pub fn spectrum_distance(spectrum: &Spectrum, expected: &[Complex64]) -> f64 {
    assert_eq!(
        spectrum.len(),
        expected.len(),
        "spectrum has {} coefficients, expected {}",
        spectrum.len(),
        expected.len()
    );
    spectrum.max_deviation(&Spectrum::new(expected.to_vec()))
}

/// Assert that `spectrum` matches `expected` within `tolerance`.
///
/// # Panics
///
/// Panics with the first offending index when a coefficient is off.
pub fn assert_spectrum_close(spectrum: &Spectrum, expected: &[Complex64], tolerance: f64) {
    assert_eq!(spectrum.len(), expected.len(), "coefficient count");
    for ((index, got), want) in spectrum.indexed().zip(expected) {
        assert!(
            (got.re - want.re).abs() <= tolerance && (got.im - want.im).abs() <= tolerance,
            "X[{index}]: expected {want}, got {got}"
        );
    }
}
