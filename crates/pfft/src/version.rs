//! Version information.

/// Get the version string.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Version line with the default rank count.
#[must_use]
pub fn full_version() -> String {
    format!(
        "pfft {} (default ranks {})",
        version(),
        pfft_core::DEFAULT_RANKS
    )
}
