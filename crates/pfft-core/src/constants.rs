//! Constants for transform sizing, defaults and exit codes.

/// Value stored in the unused slot 0 of the shared arrays.
pub const SENTINEL: f64 = 0.0;

/// Default number of ranks (one coordinator plus four workers).
pub const DEFAULT_RANKS: usize = 5;

/// Default tolerance when comparing against the reference transform.
///
/// Interpreted relative to the L1 norm of the input signal, which bounds
/// the magnitude of every DFT coefficient.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Default bound on any single barrier or broadcast wait.
pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 30;

/// Largest number of transform points accepted (2^26).
pub const MAX_POINTS: usize = 1 << 26;

/// Default location of the input sequence.
pub const DEFAULT_INPUT_PATH: &str = "res/input.txt";

/// Process exit codes.
pub mod exit_codes {
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A rank timed out waiting on a collective.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Distributed result disagrees with the reference transform.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration or input shape.
    pub const ERROR_CONFIG: i32 = 4;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
