//! Human-readable error descriptions and structured JSON error formatting.

use turret_core::error::{BuildError, TurretError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingAxes => {
                "What happened: No azimuth/elevation actuators were provided to the turret.\nLikely causes: Axis drivers failed to initialize or were not wired into the builder.\nHow to fix: Pass both position actuators via with_axes(...).".to_string()
            }
            BuildError::MissingLauncher => {
                "What happened: No flywheel/feeder was provided to the turret.\nLikely causes: Launcher drivers failed to initialize or were not wired into the builder.\nHow to fix: Pass the flywheel and feeder via with_launcher(...).".to_string()
            }
            BuildError::MissingVision => {
                "What happened: No vision source was provided to the turret.\nLikely causes: The detector failed to start or was not wired into the builder.\nHow to fix: Pass a vision source via with_vision(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/turret_config.toml for a sample."
            ),
            BuildError::Units(e) => format!(
                "What happened: Axis or flywheel gearing is unusable ({e}).\nLikely causes: A zero gear ratio or ticks-per-revolution in the config.\nHow to fix: Set non-zero gearing in [azimuth], [elevation] and [flywheel]."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<TurretError>() {
        return match te {
            TurretError::Config(msg) if msg.contains("vision trace CSV must have headers") => {
                "Invalid headers in vision trace CSV. Expected 'valid,tx,ty,velocity_fps'.".to_string()
            }
            TurretError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: Missing sections, a typo in a key, or out-of-range values.\nHow to fix: Edit the TOML config (or the vision trace CSV) and try again."
            ),
            TurretError::Timeout => {
                "What happened: An actuator did not answer in time.\nLikely causes: Bus wiring, power, or a controller that is rebooting.\nHow to fix: Check the CAN/serial link and actuator power, then rerun.".to_string()
            }
            TurretError::Overrun(by) => format!(
                "What happened: A control tick overran its period by {by:?}.\nLikely causes: A loaded host or a period too short for this machine.\nHow to fix: Raise runner.period_ms, run with --rt, or set runner.overrun = \"warn\"."
            ),
            TurretError::Hardware(_) | TurretError::HardwareFault(_) => format!(
                "What happened: {te}.\nLikely causes: An actuator reported a fault or rejected a command.\nHow to fix: Inspect the actuator, clear the fault, and rerun with --log-level=debug for context."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 config, 3 build, 4 overrun, 5 hardware, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(te) = err.downcast_ref::<TurretError>() {
        return match te {
            TurretError::Config(_) => 2,
            TurretError::Overrun(_) => 4,
            TurretError::Hardware(_) | TurretError::HardwareFault(_) | TurretError::Timeout => 5,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 3;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(te) = err.downcast_ref::<TurretError>() {
        return match te {
            TurretError::Config(_) => "Config",
            TurretError::Overrun(_) => "Overrun",
            TurretError::Timeout => "Timeout",
            TurretError::Hardware(_) => "Hardware",
            TurretError::HardwareFault(_) => "HardwareFault",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    if let Some(TurretError::Overrun(by)) = err.downcast_ref::<TurretError>() {
        return json!({
            "reason": "Overrun",
            "details": { "overrun_us": by.as_micros() as u64 },
            "message": humanize(err),
        })
        .to_string();
    }
    json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_two() {
        let err = eyre::Report::new(TurretError::Config("missing field".into()));
        assert_eq!(exit_code_for_error(&err), 2);
        assert!(humanize(&err).contains("missing field"));
    }

    #[test]
    fn wrapped_hardware_error_keeps_its_code() {
        use eyre::WrapErr;
        let err: eyre::Result<()> =
            Err(eyre::Report::new(TurretError::Timeout)).wrap_err("control tick 3");
        let err = err.unwrap_err();
        assert_eq!(exit_code_for_error(&err), 5);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Timeout");
    }

    #[test]
    fn build_errors_exit_with_three() {
        let err = eyre::Report::new(BuildError::MissingVision);
        assert_eq!(exit_code_for_error(&err), 3);
        assert!(humanize(&err).contains("with_vision"));
    }
}
