//! Fixed-period driver for `Turret::periodic`.
//!
//! The control components never read the clock. The runner holds the period,
//! hands the nominal `dt` to every tick and decides what an overrun means.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eyre::WrapErr;
use turret_traits::clock::Clock;

use crate::builder::Turret;
use crate::error::{Result, TurretError};
use crate::status::{TurretCommand, TurretTelemetry};
use crate::util::{DEFAULT_PERIOD_MS, dt_seconds, period_from_ms};

/// What to do when a tick runs past its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrunPolicy {
    /// Log and count it; keep running.
    #[default]
    Warn,
    /// Stop the turret and fail with `TurretError::Overrun`.
    Fatal,
}

#[derive(Debug, Clone)]
pub struct RunParams {
    pub period: Duration,
    /// `None` runs until shutdown is requested.
    pub max_ticks: Option<u64>,
    pub overrun: OverrunPolicy,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            period: period_from_ms(DEFAULT_PERIOD_MS),
            max_ticks: None,
            overrun: OverrunPolicy::Warn,
        }
    }
}

impl RunParams {
    pub fn new(period_ms: u64, max_ticks: Option<u64>, overrun: OverrunPolicy) -> Self {
        Self {
            period: period_from_ms(period_ms),
            max_ticks,
            overrun,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub overruns: u64,
    pub worst_overrun: Duration,
    pub stopped_by_shutdown: bool,
    pub last: Option<TurretTelemetry>,
}

/// Drive `turret` until `max_ticks` or `shutdown`.
///
/// `next_command` is asked for the command of each tick (0-based);
/// `on_tick` sees every committed snapshot. On any error the turret is
/// brought to a safe stop before the error is returned, and a clean exit
/// also ends with a safe stop.
pub fn run<C, F, G>(
    turret: &mut Turret,
    clock: &C,
    params: &RunParams,
    mut next_command: F,
    mut on_tick: G,
    shutdown: &AtomicBool,
) -> Result<RunSummary>
where
    C: Clock + ?Sized,
    F: FnMut(u64) -> TurretCommand,
    G: FnMut(u64, &TurretTelemetry),
{
    let dt = dt_seconds(params.period);
    let mut summary = RunSummary::default();
    tracing::info!(
        period_ms = params.period.as_millis() as u64,
        max_ticks = params.max_ticks,
        policy = ?params.overrun,
        "run start"
    );

    loop {
        if params.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(ticks = summary.ticks, "shutdown requested");
            summary.stopped_by_shutdown = true;
            break;
        }

        let start = clock.now();
        let cmd = next_command(summary.ticks);
        let telemetry = match turret.periodic(dt, &cmd) {
            Ok(t) => t,
            Err(e) => {
                stop_after_error(turret);
                return Err(e).wrap_err_with(|| format!("control tick {}", summary.ticks));
            }
        };
        on_tick(summary.ticks, &telemetry);
        summary.last = Some(telemetry);
        summary.ticks += 1;

        if let Some(over) = clock.sleep_until_period_end(start, params.period) {
            summary.overruns += 1;
            summary.worst_overrun = summary.worst_overrun.max(over);
            match params.overrun {
                OverrunPolicy::Warn => {
                    tracing::warn!(
                        tick = summary.ticks,
                        overrun_us = over.as_micros() as u64,
                        "tick overran period"
                    );
                }
                OverrunPolicy::Fatal => {
                    tracing::error!(
                        tick = summary.ticks,
                        overrun_us = over.as_micros() as u64,
                        "tick overran period"
                    );
                    stop_after_error(turret);
                    return Err(eyre::Report::new(TurretError::Overrun(over)));
                }
            }
        }
    }

    turret.safe_stop().wrap_err("safe stop at end of run")?;
    tracing::info!(
        ticks = summary.ticks,
        overruns = summary.overruns,
        "run complete"
    );
    Ok(summary)
}

fn stop_after_error(turret: &mut Turret) {
    if let Err(e) = turret.safe_stop() {
        tracing::warn!(error = %e, "safe stop failed");
    }
}
