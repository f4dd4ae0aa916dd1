#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing, validation and the core conversion must reject bad input without panicking.
    let Ok(cfg) = turret_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let core_cfg = turret_core::TurretCfg::from(&cfg);
    let _ = turret_core::GearedScale::new(
        core_cfg.azimuth.ticks_per_revolution,
        core_cfg.azimuth.gear_ratio,
    );
});
