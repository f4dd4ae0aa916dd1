use rstest::rstest;
use turret_config::{OverrunPolicy, load_toml};

const VALID: &str = r#"
[azimuth]
ticks_per_revolution = 4096
gear_ratio = 0.1
forward_soft_limit_deg = 90.0
reverse_soft_limit_deg = 90.0
default_turn_rate_deg = 60.0

[elevation]
ticks_per_revolution = 4096
gear_ratio = 0.25
default_turn_rate_deg = 20.0

[flywheel]
ticks_per_revolution = 2048
radius_in = 2.0
default_rpm = 4000.0
spin_up_deadband_ticks = 250.0

[feeder]
output_percent = 0.6

[aim]
use_filter = true
filter_length = 4
"#;

#[test]
fn accepts_minimal_config_and_fills_defaults() {
    let cfg = load_toml(VALID).expect("parse TOML");
    cfg.validate().expect("valid config should pass");

    assert_eq!(cfg.runner.period_ms, 20);
    assert_eq!(cfg.runner.overrun, OverrunPolicy::Warn);
    assert!(cfg.ball_transfer.enabled);
    assert_eq!(cfg.flywheel.gear_ratio, 1.0);
    // Elevation limits were left out entirely -> disabled
    assert_eq!(cfg.elevation.soft_limit_deg(), None);
    assert_eq!(cfg.azimuth.soft_limit_deg(), Some((-90.0, 90.0)));
}

#[test]
fn rejects_missing_flywheel_section() {
    let toml = VALID.replace("[flywheel]", "[flywheel_typo]");
    assert!(load_toml(&toml).is_err());
}

#[rstest]
#[case("gear_ratio = 0.1", "gear_ratio = 0.0", "azimuth.gear_ratio")]
#[case("ticks_per_revolution = 2048", "ticks_per_revolution = 0", "flywheel.ticks_per_revolution")]
#[case("radius_in = 2.0", "radius_in = -2.0", "flywheel.radius_in")]
#[case("radius_in = 2.0", "radius_in = 2.0\ngear_ratio = -2.0", "flywheel.gear_ratio")]
#[case("filter_length = 4", "filter_length = 0", "aim.filter_length")]
#[case("output_percent = 0.6", "output_percent = 1.5", "feeder.output_percent")]
#[case("spin_up_deadband_ticks = 250.0", "spin_up_deadband_ticks = -1.0", "spin_up_deadband_ticks")]
#[case("reverse_soft_limit_deg = 90.0", "reverse_soft_limit_deg = -5.0", "reverse_soft_limit_deg")]
fn rejects_invalid_values(#[case] from: &str, #[case] to: &str, #[case] needle: &str) {
    let toml = VALID.replacen(from, to, 1);
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[test]
fn parses_fatal_overrun_policy() {
    let toml = format!("{VALID}\n[runner]\nperiod_ms = 10\noverrun = \"fatal\"\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("valid");
    assert_eq!(cfg.runner.overrun, OverrunPolicy::Fatal);
    assert_eq!(cfg.runner.period_ms, 10);
}
