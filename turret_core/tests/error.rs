mod common;

use std::error::Error;

use common::{cfg, rig};
use turret_core::error::TurretError;
use turret_core::hw_error::map_hw_error;
use turret_core::mocks::NoVision;
use turret_core::{Turret, TurretCommand};
use turret_hardware::{SimPercentOutput, SimVelocityActuator};
use turret_traits::PositionActuator;

/// Position actuator that works once, then fails with a fixed message.
struct FlakyAxis {
    calls: u32,
    msg: &'static str,
}

impl PositionActuator for FlakyAxis {
    fn set_position_target(&mut self, _ticks: i32) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.calls += 1;
        if self.calls > 1 {
            return Err(self.msg.into());
        }
        Ok(())
    }
    fn measured_position(&mut self) -> Result<i32, Box<dyn Error + Send + Sync>> {
        Ok(0)
    }
}

fn flaky_turret(msg: &'static str) -> Turret {
    Turret::builder()
        .with_axes(
            FlakyAxis { calls: 0, msg },
            FlakyAxis {
                calls: 0,
                msg: "never",
            },
        )
        .with_launcher(
            SimVelocityActuator::new("flywheel", 1.0),
            SimPercentOutput::new("feeder"),
        )
        .with_vision(NoVision)
        .build()
        .unwrap()
}

#[test]
fn string_errors_map_to_hardware() {
    let mut turret = flaky_turret("bus glitch");
    turret.periodic(0.02, &TurretCommand::hold()).unwrap();
    let err = turret
        .periodic(0.02, &TurretCommand::hold())
        .expect_err("expected hardware error");
    match err.downcast_ref::<TurretError>() {
        Some(TurretError::Hardware(msg)) => assert_eq!(msg, "bus glitch"),
        other => panic!("expected Hardware, got {other:?}"),
    }
    assert!(format!("{err:#}").contains("azimuth set_position_target"));
}

#[test]
fn timeout_text_maps_to_timeout() {
    let mut turret = flaky_turret("sensor timeout");
    turret.periodic(0.02, &TurretCommand::hold()).unwrap();
    let err = turret.periodic(0.02, &TurretCommand::hold()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TurretError>(),
        Some(TurretError::Timeout)
    ));
}

#[test]
fn typed_hardware_errors_are_downcast() {
    use turret_hardware::error::HwError;
    assert!(matches!(map_hw_error(&HwError::Timeout), TurretError::Timeout));
    assert!(matches!(
        map_hw_error(&HwError::Disconnected("azimuth")),
        TurretError::HardwareFault(_)
    ));
    let io = HwError::Io(std::io::Error::other("spi"));
    assert!(matches!(map_hw_error(&io), TurretError::Hardware(_)));
}

#[test]
fn fault_mid_fire_zeroes_feeder() {
    let mut r = rig(cfg(None), Vec::new(), 1.0);
    let fire = TurretCommand::hold().firing(true);
    r.turret.periodic(0.02, &fire).unwrap();
    assert_eq!(r.feeder.output(), 0.6);

    r.flywheel.inject_fault("overcurrent");
    let err = r.turret.periodic(0.02, &fire).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TurretError>(),
        Some(TurretError::HardwareFault(_))
    ));
    assert_eq!(r.feeder.output(), 0.0);
}

#[test]
fn axis_fault_is_reported_before_outputs_move() {
    let mut r = rig(cfg(None), Vec::new(), 1.0);
    r.azimuth.inject_fault("encoder");
    let err = r
        .turret
        .periodic(0.02, &TurretCommand::hold().firing(true))
        .unwrap_err();
    assert!(format!("{err:#}").contains("azimuth measured_position"));
    assert_eq!(r.flywheel.commands(), 0);
}
