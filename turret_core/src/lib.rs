#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Turret aim-and-fire control engine (hardware-agnostic).
//!
//! All hardware interactions go through the actuator and vision traits in
//! `turret_traits`. One `periodic(dt, cmd)` call per control period drives
//! the whole pipeline synchronously.
//!
//! ## Architecture
//!
//! - **Units**: degree/RPM to native-unit conversion with gear ratios (`units`)
//! - **Axes**: one generic position controller, instantiated for azimuth and elevation (`axis`)
//! - **Soft limits**: software clamp on every target mutation (`soft_limit`)
//! - **Aim**: vision offsets to absolute targets, optional azimuth smoothing (`aim`, `filter`)
//! - **Launcher**: flywheel velocity loop with at-speed deadband (`flywheel`)
//!   and the feeder interlock gated on it (`feed`)
//! - **Ball transfer**: ungated open-loop stage (`transfer`)
//! - **Runner**: fixed-period loop with overrun detection (`runner`)
//!
//! ## Units
//!
//! Axis targets are carried as `f64` native ticks so rate drift below one
//! tick per period still integrates; only the value written to the actuator
//! is rounded, and never past a soft limit (`soft_limit::quantize_inside`).

pub mod aim;
pub mod axis;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod core;
pub mod error;
pub mod feed;
pub mod filter;
pub mod fixed_point;
pub mod flywheel;
pub mod hw_error;
pub mod mocks;
pub mod runner;
pub mod soft_limit;
pub mod status;
pub mod transfer;
pub mod tuning;
pub mod units;
pub mod util;

pub use aim::{AimController, AimSolution};
pub use axis::AxisController;
pub use builder::{Missing, Set, Turret, TurretBuilder, build_turret};
pub use config::{AimCfg, FeederCfg, FlywheelCfg, GearedAxisConfig, TransferCfg, TurretCfg};
pub use crate::core::TurretCore;
pub use error::{BuildError, TurretError};
pub use feed::{FeedInterlock, FeederState};
pub use flywheel::{FlywheelController, FlywheelState, at_speed};
pub use runner::{OverrunPolicy, RunParams, RunSummary};
pub use soft_limit::{SoftLimit, clamp};
pub use status::{AimMode, AxisTelemetry, FlywheelTelemetry, TurretCommand, TurretTelemetry};
pub use transfer::{BallTransfer, TransferState};
pub use units::{GearedScale, UnitError, convert};
