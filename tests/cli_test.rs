use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

const NTP_LOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/ntp_output.txt");
const TRACEROUTE_LOG: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/data/traceroute_results.txt"
);

/// Binary isolated from any user config.
fn netlens(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("netlens").unwrap();
    cmd.env("NETLENS_CONFIG_DIR", config_dir.path())
        .env_remove("RUST_LOG")
        .arg("--nocolor");
    cmd
}

#[test]
fn test_invalid_input_no_args() {
    let dir = TempDir::new().unwrap();
    netlens(&dir).assert().failure();
}

#[test]
fn test_ntp_text_summary() {
    let dir = TempDir::new().unwrap();
    netlens(&dir)
        .args(["ntp", NTP_LOG])
        .assert()
        .success()
        .stdout(contains("Parsed NTP Data:"))
        .stdout(contains("meg.magnet.ie"))
        .stdout(contains("Stats (min, max, mean, std) for Delay & Jitter:"))
        .stdout(contains("time.example").not());
}

#[test]
fn test_ntp_verbose_shows_skips() {
    let dir = TempDir::new().unwrap();
    netlens(&dir)
        .args(["ntp", NTP_LOG, "--verbose"])
        .assert()
        .success()
        .stdout(contains("bad number: 1"));
}

#[test]
fn test_ntp_json_output() {
    let dir = TempDir::new().unwrap();
    let out = netlens(&dir)
        .args(["ntp", NTP_LOG, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["samples"].as_array().unwrap().len(), 4);
    assert_eq!(v["report"]["bad_number"], 1);
    assert_eq!(v["stats"]["ntp.tcd.ie"]["Delay"]["count"], 2);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    netlens(&dir)
        .args(["ntp", "/no/such/ntp_output.txt"])
        .assert()
        .code(1)
        .stdout(contains("Error:"));
}

#[test]
fn test_empty_log_is_informational() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("empty.txt");
    fs::write(&log, "nothing to see here\n").unwrap();
    netlens(&dir)
        .arg("ntp")
        .arg(&log)
        .assert()
        .success()
        .stdout(contains("No valid NTP data found."))
        .stdout(contains("Stats").not());
    netlens(&dir)
        .arg("traceroute")
        .arg(&log)
        .assert()
        .success()
        .stdout(contains("No valid traceroute data found."));
}

#[test]
fn test_traceroute_dot_export() {
    let dir = TempDir::new().unwrap();
    let dot = dir.path().join("hops.dot");
    netlens(&dir)
        .args(["traceroute", TRACEROUTE_LOG, "--dot"])
        .arg(&dot)
        .assert()
        .success()
        .stdout(contains("google.com"))
        .stdout(contains("Graph written to"));
    let text = fs::read_to_string(&dot).unwrap();
    assert!(text.starts_with("digraph traceroute {"));
    assert!(text.contains("Destination: tcd.ie"));
    assert!(text.contains("ms\"]"));
}

#[test]
fn test_pretty_requires_json() {
    let dir = TempDir::new().unwrap();
    netlens(&dir)
        .args(["ntp", NTP_LOG, "--pretty"])
        .assert()
        .code(2)
        .stdout(contains("Error:"));
}

#[test]
fn test_config_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let config = format!(
        "[defaults]\nntp_log = \"{}\"\nformat = \"json\"\n",
        NTP_LOG.replace('\\', "\\\\")
    );
    fs::write(dir.path().join("config.toml"), config).unwrap();
    netlens(&dir)
        .arg("ntp")
        .assert()
        .success()
        .stdout(contains("\"schema_version\":1"));
}

#[test]
fn test_bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[defaults]\nformat = \"yaml\"\n").unwrap();
    netlens(&dir)
        .args(["ntp", NTP_LOG, "--config"])
        .arg(&config)
        .assert()
        .code(3)
        .stdout(contains("Error: config:"));
}
