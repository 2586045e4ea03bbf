//! pfft library: application logic for the distributed FFT binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
