//! Error type shared by the transform crates.

use pfft_shmem::ShmemError;

/// Error type for transform setup, execution and verification.
#[derive(Debug, thiserror::Error)]
pub enum FftError {
    /// Invalid configuration (rank count, transform size, partition plan).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or empty input sequence.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The input file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failure in the shared heap or a collective.
    #[error(transparent)]
    Comm(#[from] ShmemError),

    /// Distributed result disagrees with the reference transform.
    #[error("result mismatch: deviation {deviation:.3e} exceeds tolerance {tolerance:.3e}")]
    Mismatch {
        /// Largest observed deviation, scaled by the signal norm.
        deviation: f64,
        /// Accepted deviation.
        tolerance: f64,
    },
}
