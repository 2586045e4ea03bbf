//! Sample input: whitespace-separated reals.
//!
//! Strict parsing rejects the first malformed token. Lenient parsing stops
//! there instead and keeps the samples read so far.

use std::fs;
use std::path::Path;

use pfft_core::FftError;
use tracing::{debug, warn};

/// Parse whitespace-separated samples from `text`.
pub fn parse_samples(text: &str, lenient: bool) -> Result<Vec<f64>, FftError> {
    let mut samples = Vec::new();
    for (position, token) in text.split_whitespace().enumerate() {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => samples.push(value),
            _ if lenient => {
                warn!(
                    token,
                    position = position + 1,
                    kept = samples.len(),
                    "stopping at malformed sample"
                );
                break;
            }
            _ => {
                return Err(FftError::InvalidInput(format!(
                    "malformed sample {token:?} at position {}",
                    position + 1
                )))
            }
        }
    }
    if samples.is_empty() {
        return Err(FftError::InvalidInput("input sequence is empty".into()));
    }
    Ok(samples)
}

/// Read and parse the samples in the file at `path`.
pub fn read_samples(path: &Path, lenient: bool) -> Result<Vec<f64>, FftError> {
    let text = fs::read_to_string(path).map_err(|source| FftError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let samples = parse_samples(&text, lenient)?;
    debug!(path = %path.display(), count = samples.len(), "read samples");
    Ok(samples)
}
