//! Spectrum presenters.

use std::io;

use clap::ValueEnum;
use pfft_engine::{SpectrumPresenter, TransformResult};
use pfft_shmem::CommSnapshot;
use serde::Serialize;

use crate::output::{format_coefficients, format_compute_time, format_duration};

/// Rendering of a transform result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Coefficient table and compute time.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// Presenter for `format`.
#[must_use]
pub fn presenter_for(format: OutputFormat, quiet: bool, stats: bool) -> Box<dyn SpectrumPresenter> {
    match format {
        OutputFormat::Text => Box::new(TextPresenter::new(quiet, stats)),
        OutputFormat::Json => Box::new(JsonPresenter::new(stats)),
    }
}

/// Plain-text presenter.
pub struct TextPresenter {
    quiet: bool,
    stats: bool,
}

impl TextPresenter {
    #[must_use]
    pub fn new(quiet: bool, stats: bool) -> Self {
        Self { quiet, stats }
    }
}

impl SpectrumPresenter for TextPresenter {
    fn present(&self, result: &TransformResult, out: &mut dyn io::Write) -> io::Result<()> {
        let table = format_coefficients(result.spectrum.indexed());
        if self.quiet {
            return out.write_all(table.as_bytes());
        }

        writeln!(out)?;
        out.write_all(table.as_bytes())?;
        writeln!(out)?;
        writeln!(out, "{}", format_compute_time(result.duration))?;
        writeln!(out)?;

        if let Some(deviation) = result.deviation {
            writeln!(out, "Verified against reference: deviation {deviation:.3e}")?;
        }
        if self.stats {
            write_stats(result, out)?;
        }
        Ok(())
    }
}

fn write_stats(result: &TransformResult, out: &mut dyn io::Write) -> io::Result<()> {
    writeln!(
        out,
        "Ranks: {}  Points: {}  Stages: {}  Wall: {}",
        result.ranks,
        result.points,
        result.stages,
        format_duration(result.duration)
    )?;
    writeln!(out, "{:-<60}", "")?;
    writeln!(
        out,
        "  {:<8} {:>10} {:>10} {:>10} {:>10}",
        "rank", "gets", "puts", "barriers", "broadcasts"
    )?;
    for (rank, s) in result.stats.iter().enumerate() {
        writeln!(
            out,
            "  {:<8} {:>10} {:>10} {:>10} {:>10}",
            rank, s.gets, s.puts, s.barriers, s.broadcasts
        )?;
    }
    let total = result.total_stats();
    writeln!(
        out,
        "  {:<8} {:>10} {:>10} {:>10} {:>10}",
        "total", total.gets, total.puts, total.barriers, total.broadcasts
    )
}

/// JSON presenter.
pub struct JsonPresenter {
    stats: bool,
}

impl JsonPresenter {
    #[must_use]
    pub fn new(stats: bool) -> Self {
        Self { stats }
    }
}

#[derive(Serialize)]
struct JsonCoefficient {
    index: usize,
    re: f64,
    im: f64,
}

#[derive(Serialize)]
struct JsonRankStats {
    rank: usize,
    gets: u64,
    puts: u64,
    barriers: u64,
    broadcasts: u64,
}

impl JsonRankStats {
    fn new(rank: usize, s: &CommSnapshot) -> Self {
        Self {
            rank,
            gets: s.gets,
            puts: s.puts,
            barriers: s.barriers,
            broadcasts: s.broadcasts,
        }
    }
}

#[derive(Serialize)]
struct JsonReport {
    points: usize,
    ranks: usize,
    stages: u32,
    duration_ms: f64,
    coefficients: Vec<JsonCoefficient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deviation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<Vec<JsonRankStats>>,
}

impl SpectrumPresenter for JsonPresenter {
    fn present(&self, result: &TransformResult, out: &mut dyn io::Write) -> io::Result<()> {
        let report = JsonReport {
            points: result.points,
            ranks: result.ranks,
            stages: result.stages,
            duration_ms: result.duration.as_secs_f64() * 1e3,
            coefficients: result
                .spectrum
                .indexed()
                .map(|(index, c)| JsonCoefficient {
                    index,
                    re: c.re,
                    im: c.im,
                })
                .collect(),
            deviation: result.deviation,
            stats: self.stats.then(|| {
                result
                    .stats
                    .iter()
                    .enumerate()
                    .map(|(rank, s)| JsonRankStats::new(rank, s))
                    .collect()
            }),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use num_complex::Complex64;
    use pfft_core::Spectrum;

    use super::*;

    fn result() -> TransformResult {
        TransformResult {
            spectrum: Spectrum::new(vec![
                Complex64::new(4.0, 0.0),
                Complex64::new(0.0, -0.0),
            ]),
            points: 2,
            ranks: 3,
            stages: 1,
            duration: Duration::from_micros(250),
            stats: vec![CommSnapshot::default(); 3],
            deviation: None,
        }
    }

    fn render(presenter: &dyn SpectrumPresenter) -> String {
        let mut buf = Vec::new();
        presenter.present(&result(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_layout() {
        let text = render(&TextPresenter::new(false, false));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "X[  1] =   4.00 + i0.00  ");
        // Negative zero prints with a plus sign.
        assert_eq!(lines[2], "X[  2] =   0.00 + i0.00  ");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Parallel FFT computation time: 0.2500 ms");
    }

    #[test]
    fn quiet_prints_only_coefficients() {
        let text = render(&TextPresenter::new(true, true));
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("computation time"));
    }

    #[test]
    fn stats_table_lists_every_rank() {
        let text = render(&TextPresenter::new(false, true));
        assert!(text.contains("broadcasts"));
        assert!(text.contains("total"));
    }

    #[test]
    fn json_shape() {
        let text = render(&JsonPresenter::new(false));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["points"], 2);
        assert_eq!(value["ranks"], 3);
        assert_eq!(value["stages"], 1);
        assert_eq!(value["coefficients"][0]["index"], 1);
        assert_eq!(value["coefficients"][0]["re"], 4.0);
        assert!(value.get("stats").is_none());
        assert!(value.get("deviation").is_none());
    }

    #[test]
    fn json_with_stats() {
        let text = render(&JsonPresenter::new(true));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["stats"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn factory_picks_format() {
        let json = presenter_for(OutputFormat::Json, false, false);
        let mut buf = Vec::new();
        json.present(&result(), &mut buf).unwrap();
        assert!(buf.starts_with(b"{"));
    }
}
