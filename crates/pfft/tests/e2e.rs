//! End-to-end CLI integration tests.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn pfft() -> Command {
    let mut cmd = Command::cargo_bin("pfft").expect("binary not found");
    cmd.env_remove("PFFT_RANKS").env_remove("PFFT_INPUT");
    cmd
}

fn input(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn help_flag() {
    pfft()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--ranks"));
}

#[test]
fn version_flag() {
    pfft()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pfft"));
}

#[test]
fn constant_signal_text() {
    let file = input("1 1 1 1\n");
    pfft()
        .arg("-i")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("X[  1] =   4.00 + i0.00"))
        .stdout(predicate::str::contains("Parallel FFT computation time:"));
}

#[test]
fn quiet_prints_coefficients_only() {
    let file = input("1 0 0 0 0 0 0 0");
    let output = pfft()
        .args(["-q", "-n", "3", "-i"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 8);
    assert!(stdout.lines().all(|l| l.contains("=   1.00 + i0.00")));
}

#[test]
fn json_output() {
    let file = input("1 2 3 4");
    let output = pfft()
        .args(["--format", "json", "--ranks", "3", "-i"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["points"], 4);
    assert_eq!(value["ranks"], 3);
    assert_eq!(value["stages"], 2);
    let coefficients = value["coefficients"].as_array().unwrap();
    assert_eq!(coefficients.len(), 4);
    assert_eq!(coefficients[0]["re"], 10.0);
}

#[test]
fn ranks_from_env() {
    let file = input("1 2 3 4");
    let output = pfft()
        .env("PFFT_RANKS", "2")
        .env("PFFT_INPUT", file.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ranks"], 2);
}

#[test]
fn output_file() {
    let file = input("1 1 1 1");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("spectrum.txt");
    pfft()
        .arg("-i")
        .arg(file.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let written = std::fs::read_to_string(out).unwrap();
    assert!(written.contains("X[  4]"));
}

#[test]
fn verify_and_stats() {
    let file = input("3 1 4 1 5 9 2 6");
    pfft()
        .args(["--verify", "--stats", "-i"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Verified against reference"))
        .stdout(predicate::str::contains("barriers"));
}

#[test]
fn missing_file_fails() {
    pfft()
        .args(["-i", "/nonexistent/pfft/input.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn malformed_input_is_config_error() {
    let file = input("1 2 x 4");
    pfft()
        .arg("-i")
        .arg(file.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("malformed sample"));
}

#[test]
fn lenient_keeps_prefix() {
    let file = input("1 1 oops 7");
    pfft()
        .args(["--lenient", "-q", "-i"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("X[  1] =   2.00"));
}

#[test]
fn non_power_of_two_requires_pad() {
    let file = input("1 2 3");
    pfft()
        .arg("-i")
        .arg(file.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--pad"));

    pfft()
        .args(["--pad", "-q", "-i"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("X[  1] =   6.00"));
}

#[test]
fn strict_remainder_rejects_uneven_split() {
    let file = input("1 2 3 4 5 6 7 8");
    pfft()
        .args(["--remainder", "strict", "-n", "4", "-i"])
        .arg(file.path())
        .assert()
        .code(4);
}

#[test]
fn single_rank_is_rejected() {
    let file = input("1 1");
    pfft()
        .args(["-n", "1", "-i"])
        .arg(file.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("at least two ranks"));
}

#[test]
fn completion_bash() {
    pfft()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pfft"));
}
