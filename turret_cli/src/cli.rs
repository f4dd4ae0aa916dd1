//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "turret", version, about = "Turret aim-and-fire controller (simulated backend)")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/turret_config.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Memory locking mode for real-time operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum RtLock {
    /// Do not lock memory
    None,
    /// Lock currently resident pages
    Current,
    /// Lock current and future pages
    All,
}

impl RtLock {
    #[inline]
    pub fn os_default() -> Self {
        if cfg!(target_os = "linux") {
            RtLock::Current
        } else {
            RtLock::None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the control loop against simulated devices
    Run {
        /// Stop after this many ticks (default: run until Ctrl-C)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Aim from vision every tick
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["az_rate", "el_rate"])]
        auto: bool,
        /// Hold the fire command for the whole run
        #[arg(long, action = ArgAction::SetTrue)]
        fire: bool,
        /// Manual azimuth stick in [-1, 1]
        #[arg(long, value_name = "FRACTION", allow_hyphen_values = true)]
        az_rate: Option<f64>,
        /// Manual elevation stick in [-1, 1]
        #[arg(long, value_name = "FRACTION", allow_hyphen_values = true)]
        el_rate: Option<f64>,
        /// Replay vision frames from CSV (headers: valid,tx,ty,velocity_fps)
        #[arg(long, value_name = "FILE")]
        vision_trace: Option<PathBuf>,
        /// Live override of the shooter RPM used when firing without auto-aim
        #[arg(long, value_name = "RPM")]
        rpm: Option<f64>,
        /// Override runner.period_ms from the config
        #[arg(long, value_name = "MS")]
        period_ms: Option<u64>,
        /// Enable real-time mode (SCHED_FIFO, mlockall)
        #[arg(
            long,
            action = ArgAction::SetTrue,
            long_help = "Enable real-time mode on supported OSes.\n\nLinux: Attempts SCHED_FIFO priority and calls mlockall to lock the process address space into RAM. This reduces page faults and jitter but may require elevated privileges or ulimits (e.g., memlock).\n\nOther OSes: ignored with a warning."
        )]
        rt: bool,
        /// Real-time priority for SCHED_FIFO on Linux (1..=max)
        #[arg(long, value_name = "PRIO")]
        rt_prio: Option<i32>,
        /// Select memory locking mode for --rt: none, current, or all
        #[arg(long, value_enum, value_name = "MODE")]
        rt_lock: Option<RtLock>,
    },
    /// Build the turret against simulated devices and run a single tick
    SelfCheck,
    /// Health check for operational monitoring
    Health,
}
