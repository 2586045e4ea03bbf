//! Serial reference transforms used to verify distributed results.

use std::f64::consts::PI;

use num_complex::Complex64;
use num_traits::Zero;
use rayon::prelude::*;
use tracing::debug;

use crate::error::FftError;
use crate::spectrum::Spectrum;

/// Sizes up to this use the direct O(n^2) transform.
const DIRECT_THRESHOLD: usize = 1024;

/// Direct DFT `X[k] = sum x[n] e^{-2 pi i k n / N}`, one bin per rayon task.
#[must_use]
pub fn dft(samples: &[f64]) -> Vec<Complex64> {
    let n = samples.len();
    #[allow(clippy::cast_precision_loss)]
    let step = -2.0 * PI / n as f64;
    (0..n)
        .into_par_iter()
        .map(|k| {
            samples
                .iter()
                .enumerate()
                .fold(Complex64::zero(), |acc, (j, &x)| {
                    // k * j mod n keeps the angle small for large inputs.
                    #[allow(clippy::cast_precision_loss)]
                    let theta = step * ((k * j) % n) as f64;
                    acc + Complex64::from_polar(x, theta)
                })
        })
        .collect()
}

/// Iterative radix-2 FFT. The length must be a power of two.
pub fn fft_serial(samples: &[f64]) -> Result<Vec<Complex64>, FftError> {
    let n = samples.len();
    if !n.is_power_of_two() {
        return Err(FftError::Config(format!(
            "serial FFT needs a power-of-two length, got {n}"
        )));
    }
    let mut data: Vec<Complex64> = samples.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    bit_reverse_permutation(&mut data);

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        #[allow(clippy::cast_precision_loss)]
        let root = Complex64::from_polar(1.0, -2.0 * PI / size as f64);
        for start in (0..n).step_by(size) {
            let mut w = Complex64::new(1.0, 0.0);
            for j in 0..half {
                let (lo, hi) = data.split_at_mut(start + j + half);
                let t = w * hi[0];
                let u = lo[start + j];
                lo[start + j] = u + t;
                hi[0] = u - t;
                w *= root;
            }
        }
        size *= 2;
    }
    Ok(data)
}

fn bit_reverse_permutation(data: &mut [Complex64]) {
    let n = data.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

/// Reference spectrum for `samples`, picking the direct or fast path by size.
pub fn reference_transform(samples: &[f64]) -> Result<Spectrum, FftError> {
    if samples.is_empty() {
        return Err(FftError::InvalidInput("empty input sequence".into()));
    }
    let coefficients = if samples.len() <= DIRECT_THRESHOLD || !samples.len().is_power_of_two() {
        dft(samples)
    } else {
        fft_serial(samples)?
    };
    Ok(Spectrum::new(coefficients))
}

/// Compare `spectrum` with the reference transform of `samples`.
///
/// The deviation is scaled by `max(1, sum |x|)`, the bound on any coefficient
/// magnitude. Returns the scaled deviation when it is within `tolerance`.
pub fn verify(spectrum: &Spectrum, samples: &[f64], tolerance: f64) -> Result<f64, FftError> {
    let expected = reference_transform(samples)?;
    let scale = samples.iter().map(|x| x.abs()).sum::<f64>().max(1.0);
    let deviation = spectrum.max_deviation(&expected) / scale;
    debug!(deviation, tolerance, points = samples.len(), "verified spectrum");
    if deviation.is_nan() || deviation > tolerance {
        return Err(FftError::Mismatch {
            deviation,
            tolerance,
        });
    }
    Ok(deviation)
}
