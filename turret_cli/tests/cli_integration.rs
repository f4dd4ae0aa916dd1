use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

mod common;
use common::{write_trace, write_valid_config};

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["run", "--ticks", "3"], 0, "run complete: ticks=3", "stdout")]
#[case(&["run", "--ticks", "3", "--fire"], 0, "feeder=Feeding", "stdout")]
#[case(&["run", "--ticks", "2", "--az-rate", "1.0"], 0, "run complete", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["health"], 0, "\"status\":\"ok\"", "stdout")]
#[case(&["run", "--ticks", "abc"], 2, "invalid value", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("turret_cli").unwrap();

    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn missing_config_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("self-check");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration is invalid"));
}

#[rstest]
fn out_of_range_feeder_percent_is_rejected() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let text = fs::read_to_string(&cfg)
        .unwrap()
        .replace("output_percent = 0.6", "output_percent = 1.5");
    fs::write(&cfg, text).unwrap();

    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("run").arg("--ticks").arg("1");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("feeder.output_percent"));
}

#[rstest]
fn cli_reports_bad_vision_trace_header() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let trace = dir.path().join("trace.csv");
    fs::write(&trace, "valid,x,y,fps\ntrue,1.0,1.0,30.0\n").unwrap();

    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("run")
        .arg("--ticks")
        .arg("1")
        .arg("--auto")
        .arg("--vision-trace")
        .arg(&trace);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("--json")
        .arg("health");

    let out = cmd.assert().code(2).get_output().stderr.clone();
    let text = String::from_utf8(out).unwrap();
    let line = text.lines().last().unwrap();
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Config");
    assert!(v["message"].as_str().unwrap().contains("What happened"));
}

#[rstest]
fn auto_run_tracks_a_replayed_target() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let trace = write_trace(&dir, &["true,5.0,2.0,30.0", "true,0.0,0.0,30.0"]);

    let mut cmd = Command::cargo_bin("turret_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("run")
        .arg("--ticks")
        .arg("4")
        .arg("--auto")
        .arg("--vision-trace")
        .arg(&trace);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("az=5.00deg el=2.00deg"));
}
