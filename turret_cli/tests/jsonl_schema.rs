use assert_cmd::prelude::*;
use rstest::rstest;
use std::process::Command;
use tempfile::tempdir;

mod common;
use common::{write_trace, write_valid_config};

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad JSON line {l:?}: {e}")))
        .collect()
}

#[rstest]
fn run_emits_one_line_per_tick_then_a_summary() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("run")
        .arg("--ticks")
        .arg("3")
        .arg("--fire");

    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    assert_eq!(lines.len(), 4, "3 ticks + summary");

    for (i, line) in lines[..3].iter().enumerate() {
        assert_eq!(line["tick"], (i + 1) as u64);
        assert_eq!(line["mode"], "hold");
        assert!(line["azimuth"]["target_ticks"].is_number());
        assert!(line["azimuth"]["commanded_ticks"].is_number());
        assert!(line["elevation"]["clamped"].is_boolean());
        assert!(line["flywheel"]["setpoint_rpm"].is_number());
        assert_eq!(line["shooting"], true);
    }
    // The simulated flywheel settles on the first command.
    assert_eq!(lines[0]["flywheel"]["at_speed"], true);
    assert_eq!(lines[0]["feeder"], "Feeding");
    assert_eq!(lines[0]["transfer"], "Firing");

    let summary = &lines[3]["summary"];
    assert_eq!(summary["ticks"], 3);
    assert_eq!(summary["stopped_by_shutdown"], false);
    assert_eq!(summary["feeder"], "Feeding");
}

#[rstest]
fn feeder_waits_for_speed_without_blocking_transfer() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let text = std::fs::read_to_string(&cfg)
        .unwrap()
        .replace("flywheel_response = 1.0", "flywheel_response = 0.5");
    std::fs::write(&cfg, text).unwrap();

    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("run")
        .arg("--ticks")
        .arg("1")
        .arg("--fire");

    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    assert_eq!(lines[0]["flywheel"]["at_speed"], false);
    assert_eq!(lines[0]["feeder"], "Cannot fire: not at speed");
    assert_eq!(lines[0]["feeding"], false);
    assert_eq!(lines[0]["transfer"], "Firing");
}

#[rstest]
fn auto_run_reports_vision_validity() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let trace = write_trace(&dir, &["false,0.0,0.0,0.0", "true,3.0,1.0,25.0"]);

    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("run")
        .arg("--ticks")
        .arg("2")
        .arg("--auto")
        .arg("--vision-trace")
        .arg(&trace);

    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    assert_eq!(lines[0]["mode"], "auto");
    assert_eq!(lines[0]["vision_valid"], false);
    assert_eq!(lines[0]["azimuth"]["target_ticks"], 0.0);
    assert_eq!(lines[1]["vision_valid"], true);
    assert_eq!(lines[1]["azimuth"]["target_ticks"], 300.0);
    assert_eq!(lines[1]["elevation"]["target_ticks"], 100.0);
}
