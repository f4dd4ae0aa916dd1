use rstest::rstest;
use turret_hardware::error::HwError;
use turret_hardware::{SimPercentOutput, SimPositionActuator, SimVelocityActuator};
use turret_traits::{PercentOutput, PositionActuator, VelocityActuator};

#[rstest]
#[case(5000, 3000)]
#[case(-5000, -3000)]
#[case(1200, 1200)]
fn hardware_limits_clamp_targets(#[case] requested: i32, #[case] accepted: i32) {
    let mut act = SimPositionActuator::new("azimuth", 1e9);
    let probe = act.probe();
    act.configure_soft_limits(3000, -3000).unwrap();
    act.set_position_target(requested).unwrap();
    assert_eq!(probe.last_target(), Some(accepted));
    assert_eq!(probe.hw_limits(), Some((-3000, 3000)));
}

#[test]
fn position_fault_is_typed() {
    let mut act = SimPositionActuator::new("elevation", 10.0);
    let probe = act.probe();
    probe.inject_fault("encoder lost");

    let err = act.set_position_target(1).unwrap_err();
    assert!(matches!(err.downcast_ref::<HwError>(), Some(HwError::Fault(_))));
    let err = act.measured_position().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HwError>(),
        Some(HwError::Disconnected("elevation"))
    ));

    probe.clear_fault();
    assert!(act.set_position_target(1).is_ok());
}

#[test]
fn velocity_fault_reads_as_timeout() {
    let mut act = SimVelocityActuator::new("flywheel", 1.0);
    let probe = act.probe();
    act.set_velocity_target(900.0).unwrap();
    assert_eq!(probe.measured(), 900.0);
    probe.inject_fault("can bus");
    let err = act.measured_velocity().unwrap_err();
    assert!(matches!(err.downcast_ref::<HwError>(), Some(HwError::Timeout)));
}

#[test]
fn percent_output_saturates_and_counts() {
    let mut out = SimPercentOutput::new("feeder");
    let probe = out.probe();
    out.set_output(1.7).unwrap();
    assert_eq!(probe.output(), 1.0);
    out.set_output(-0.25).unwrap();
    assert_eq!(probe.output(), -0.25);
    assert_eq!(probe.writes(), 2);
}
