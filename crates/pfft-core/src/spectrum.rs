//! Transform result.

use num_complex::Complex64;

use crate::error::FftError;

/// DFT coefficients `X[1..=L]` of one run.
///
/// Index `i` holds frequency bin `i - 1`, matching the 1-based layout of the
/// shared arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    coefficients: Vec<Complex64>,
}

impl Spectrum {
    /// Wrap coefficients ordered by frequency bin.
    #[must_use]
    pub fn new(coefficients: Vec<Complex64>) -> Self {
        Self { coefficients }
    }

    /// Build from the shared real/imaginary arrays, dropping sentinel slot 0.
    pub fn from_shared(real: &[f64], imag: &[f64]) -> Result<Self, FftError> {
        if real.len() != imag.len() || real.is_empty() {
            return Err(FftError::InvalidInput(format!(
                "shared arrays have mismatched lengths {} and {}",
                real.len(),
                imag.len()
            )));
        }
        Ok(Self::new(
            real[1..]
                .iter()
                .zip(&imag[1..])
                .map(|(&re, &im)| Complex64::new(re, im))
                .collect(),
        ))
    }

    /// Number of coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether there are no coefficients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Coefficients ordered by frequency bin.
    #[must_use]
    pub fn coefficients(&self) -> &[Complex64] {
        &self.coefficients
    }

    /// Coefficient at 1-based `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Complex64> {
        index
            .checked_sub(1)
            .and_then(|i| self.coefficients.get(i))
            .copied()
    }

    /// `(index, coefficient)` pairs with 1-based indices.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, Complex64)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, &c)| (i + 1, c))
    }

    /// Largest componentwise distance to `other`, or infinity on a length mismatch.
    #[must_use]
    pub fn max_deviation(&self, other: &Self) -> f64 {
        if self.len() != other.len() {
            return f64::INFINITY;
        }
        self.coefficients
            .iter()
            .zip(&other.coefficients)
            .map(|(a, b)| (a.re - b.re).abs().max((a.im - b.im).abs()))
            .fold(0.0, f64::max)
    }

    /// Consume into the coefficient vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Complex64> {
        self.coefficients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_shared_drops_sentinel() {
        let spectrum = Spectrum::from_shared(&[9.0, 1.0, 2.0], &[9.0, -1.0, 0.5]).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert_eq!(spectrum.get(1), Some(Complex64::new(1.0, -1.0)));
        assert_eq!(spectrum.get(2), Some(Complex64::new(2.0, 0.5)));
        assert_eq!(spectrum.get(0), None);
        assert_eq!(spectrum.get(3), None);
    }

    #[test]
    fn from_shared_rejects_mismatch() {
        assert!(Spectrum::from_shared(&[0.0, 1.0], &[0.0]).is_err());
        assert!(Spectrum::from_shared(&[], &[]).is_err());
    }

    #[test]
    fn indexed_is_one_based() {
        let spectrum = Spectrum::new(vec![Complex64::new(4.0, 0.0), Complex64::new(0.0, 0.0)]);
        let indices: Vec<usize> = spectrum.indexed().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn max_deviation() {
        let a = Spectrum::new(vec![Complex64::new(1.0, 1.0), Complex64::new(2.0, 0.0)]);
        let b = Spectrum::new(vec![Complex64::new(1.0, 1.5), Complex64::new(1.75, 0.0)]);
        assert!((a.max_deviation(&b) - 0.5).abs() < 1e-12);
        assert!(a.max_deviation(&Spectrum::new(vec![])).is_infinite());
    }
}
