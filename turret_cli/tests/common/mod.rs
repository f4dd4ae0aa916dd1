use std::fs;
use std::path::PathBuf;

/// Minimal valid config for the simulated backend: 100 ticks per turret
/// degree on both axes and a flywheel that settles on the first command.
pub fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[azimuth]
ticks_per_revolution = 36000
gear_ratio = 1.0
forward_soft_limit_deg = 90.0
reverse_soft_limit_deg = 90.0
default_turn_rate_deg = 45.0

[elevation]
ticks_per_revolution = 36000
gear_ratio = 1.0
forward_soft_limit_deg = 60.0
reverse_soft_limit_deg = 5.0
default_turn_rate_deg = 20.0

[flywheel]
ticks_per_revolution = 2048
radius_in = 2.0
default_rpm = 3000.0
spin_up_deadband_ticks = 150.0

[feeder]
output_percent = 0.6

[ball_transfer]
enabled = true
output_percent = 0.4

[runner]
# keep integration runs short
period_ms = 5

[sim]
azimuth_slew_ticks = 1000000.0
elevation_slew_ticks = 1000000.0
flywheel_response = 1.0
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

pub fn write_trace(dir: &tempfile::TempDir, rows: &[&str]) -> PathBuf {
    let mut body = String::from("valid,tx,ty,velocity_fps\n");
    for r in rows {
        body.push_str(r);
        body.push('\n');
    }
    let path = dir.path().join("trace.csv");
    fs::write(&path, body).unwrap();
    path
}
