//! # pfft-core
//!
//! Building blocks of the distributed butterfly FFT that involve no
//! communication: bit reversal, partition planning, transform layout, run
//! options, the spectrum type and a serial reference transform.

pub mod bitrev;
pub mod constants;
pub mod error;
pub mod layout;
pub mod options;
pub mod partition;
pub mod reference;
pub mod role;
pub mod spectrum;

// Re-exports
pub use bitrev::{max_bit_width, reverse_bits, seed_order};
pub use constants::{exit_codes, DEFAULT_RANKS, DEFAULT_TOLERANCE, SENTINEL};
pub use error::FftError;
pub use layout::Layout;
pub use options::RunOptions;
pub use partition::{Partition, PartitionPlanner, RemainderPolicy};
pub use role::Role;
pub use spectrum::Spectrum;
