//! Error handling and exit codes.

use pfft_core::{exit_codes, FftError};
use pfft_shmem::ShmemError;

/// Exit code for a transform error.
pub fn handle_error(err: &FftError) -> i32 {
    match err {
        FftError::Config(_) | FftError::InvalidInput(_) => exit_codes::ERROR_CONFIG,
        FftError::Io { .. } => exit_codes::ERROR_GENERIC,
        FftError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
        FftError::Comm(ShmemError::Cancelled) => exit_codes::ERROR_CANCELED,
        FftError::Comm(ShmemError::Timeout { .. }) => exit_codes::ERROR_TIMEOUT,
        FftError::Comm(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Process exit code for any application error.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<FftError>())
        .map_or(exit_codes::ERROR_GENERIC, handle_error);
    u8::try_from(code).unwrap_or(1)
}
