//! CLI output formatting.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use num_complex::Complex64;

/// One coefficient line: right-aligned real part, sign, left-aligned magnitude of the imaginary part.
#[must_use]
pub fn format_coefficient(index: usize, value: Complex64) -> String {
    let sign = if value.im >= 0.0 { '+' } else { '-' };
    format!("X[{index:3}] = {:6.2} {sign} i{:<6.2}", value.re, value.im.abs())
}

/// Compute time line printed after the coefficients.
#[must_use]
pub fn format_compute_time(duration: Duration) -> String {
    format!(
        "Parallel FFT computation time: {:.4} ms",
        duration.as_secs_f64() * 1e3
    )
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Render `values` as coefficient lines.
#[must_use]
pub fn format_coefficients(values: impl IntoIterator<Item = (usize, Complex64)>) -> String {
    let mut out = String::new();
    for (index, value) in values {
        let _ = writeln!(out, "{}", format_coefficient(index, value));
    }
    out
}

/// Write a rendering to a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: &Path, rendered: &[u8]) -> io::Result<()> {
    fs::write(path, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_layout() {
        assert_eq!(
            format_coefficient(1, Complex64::new(4.0, 0.0)),
            "X[  1] =   4.00 + i0.00  "
        );
        assert_eq!(
            format_coefficient(12, Complex64::new(-1.5, -2.25)),
            "X[ 12] =  -1.50 - i2.25  "
        );
        assert_eq!(
            format_coefficient(300, Complex64::new(1234.5, 10.0)),
            "X[300] = 1234.50 + i10.00 "
        );
    }

    #[test]
    fn compute_time_has_four_decimals() {
        assert_eq!(
            format_compute_time(Duration::from_micros(1500)),
            "Parallel FFT computation time: 1.5000 ms"
        );
    }

    #[test]
    fn format_duration_units() {
        assert!(format_duration(Duration::from_nanos(500)).contains("µs"));
        assert!(format_duration(Duration::from_millis(42)).contains("ms"));
        assert_eq!(format_duration(Duration::from_secs(3)), "3.000s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30.0s");
    }

    #[test]
    fn coefficient_block() {
        let text = format_coefficients([(1, Complex64::new(1.0, 0.0)), (2, Complex64::new(0.0, -1.0))]);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains("- i1.00"));
    }

    #[test]
    fn write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_to_file(&path, b"X").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "X");
    }
}
