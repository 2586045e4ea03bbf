//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pfft_cli::OutputFormat;
use pfft_core::constants::DEFAULT_INPUT_PATH;
use pfft_core::{FftError, RemainderPolicy, RunOptions, DEFAULT_RANKS, DEFAULT_TOLERANCE};

/// pfft: distributed radix-2 butterfly FFT over a partitioned global address space.
#[derive(Parser, Debug)]
#[command(name = "pfft", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Input file of whitespace-separated real samples.
    #[arg(short, long, env = "PFFT_INPUT", default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// Total ranks, coordinator included.
    #[arg(short = 'n', long, env = "PFFT_RANKS", default_value_t = DEFAULT_RANKS)]
    pub ranks: usize,

    /// Remainder policy when workers do not divide the points: spread or strict.
    #[arg(long, default_value = "spread")]
    pub remainder: RemainderPolicy,

    /// Zero-pad the input to the next power of two.
    #[arg(long)]
    pub pad: bool,

    /// Stop at the first malformed sample instead of failing.
    #[arg(long)]
    pub lenient: bool,

    /// Barrier and broadcast timeout (e.g., "30s", "500ms", "1m").
    #[arg(long, default_value = "30s")]
    pub timeout: String,

    /// Compare the result with a serial reference transform.
    #[arg(long)]
    pub verify: bool,

    /// Accepted deviation for --verify, relative to the signal's L1 norm.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Pin rank threads to CPU cores.
    #[arg(long)]
    pub pin: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Output file path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quiet mode (only print the coefficients).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print per-rank communication counters.
    #[arg(long)]
    pub stats: bool,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the timeout string into a Duration.
    pub fn timeout_duration(&self) -> Result<Duration, FftError> {
        parse_duration(&self.timeout)
            .ok_or_else(|| FftError::Config(format!("invalid timeout: {:?}", self.timeout)))
    }

    /// Run options for the engine.
    pub fn run_options(&self) -> Result<RunOptions, FftError> {
        Ok(RunOptions {
            ranks: self.ranks,
            remainder: self.remainder,
            sync_timeout: self.timeout_duration()?,
            pad: self.pad,
            pin_cores: self.pin,
            verify: self.verify,
            tolerance: self.tolerance,
        })
    }
}

/// Parse a duration string like "5m", "1h", "30s", "500ms".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n * 3600))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
