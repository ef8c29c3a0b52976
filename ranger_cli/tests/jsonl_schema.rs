use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[sensor]
pin = 13
sample_num = 20
min_valid_mm = 301
max_valid_mm = 5000

[timeouts]
acquire_ms = 2000
poll_us = 200
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect()
}

/// Validate the JSONL schema for a successful measurement.
#[rstest]
fn jsonl_success_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("ranger").unwrap();
    cmd.env("RANGER_TEST_SIM_MM", "1000,1002,1004,1004")
        .env("RANGER_TEST_SIM_PERIOD_US", "100")
        .arg("--json")
        .arg("--log-level")
        .arg("warn")
        .arg("--config")
        .arg(&cfg)
        .arg("measure");

    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    let v = lines
        .iter()
        .find(|v| v.get("distance_mm").is_some())
        .unwrap_or_else(|| panic!("no JSONL line with distance_mm; got {lines:?}"));

    let mm = v["distance_mm"].as_u64().expect("distance_mm is an integer");
    assert!([1000, 1002, 1004].contains(&mm), "distance_mm = {mm}");
    assert!(matches!(v["basis"].as_str(), Some("mode" | "median")));
    assert_eq!(v["valid"], 20);
    assert_eq!(v["window"], 20);
    assert_eq!(v["attempts"], 1);
}

/// Validate the JSON error object when no reading is plausible.
#[rstest]
fn jsonl_no_valid_readings_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("ranger").unwrap();
    cmd.env("RANGER_TEST_SIM_MM", "120,6000")
        .env("RANGER_TEST_SIM_PERIOD_US", "100")
        .arg("--json")
        .arg("--config")
        .arg(&cfg)
        .arg("measure");

    let out = cmd.assert().code(3).get_output().stdout.clone();
    let lines = json_lines(&out);
    let v = lines
        .iter()
        .find(|v| v.get("reason").is_some())
        .unwrap_or_else(|| panic!("no JSON error line; got {lines:?}"));

    assert_eq!(v["reason"], "NoValidReadings");
    assert_eq!(v["details"]["window"], 20);
    assert_eq!(v["details"]["min_mm"], 301);
    assert_eq!(v["details"]["max_mm"], 5000);
    assert!(v["message"].as_str().unwrap().starts_with("What happened"));
}

/// Timeouts name the wait that gave up.
#[rstest]
fn jsonl_timeout_schema() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[sensor]\npin = 13\n\n[timeouts]\nacquire_ms = 30\npoll_us = 100\n").unwrap();

    let mut cmd = Command::cargo_bin("ranger").unwrap();
    cmd.env("RANGER_TEST_SIM_MM", "")
        .arg("--json")
        .arg("--config")
        .arg(&cfg)
        .arg("measure");

    let out = cmd.assert().code(4).get_output().stdout.clone();
    let lines = json_lines(&out);
    let v = lines
        .iter()
        .find(|v| v.get("reason").is_some())
        .unwrap_or_else(|| panic!("no JSON error line; got {lines:?}"));
    assert_eq!(v["reason"], "Timeout");
    assert_eq!(v["details"]["wait"], "pulses");
}
