mod cli;
mod error_fmt;
mod rt;
mod run;

use std::path::Path;

use clap::Parser;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE, RtLock};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::{RunOpts, load_config, run_turret, self_check};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli.config)?;
    init_tracing(cli.json, &cli.log_level, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Run {
            ticks,
            auto,
            fire,
            az_rate,
            el_rate,
            vision_trace,
            rpm,
            period_ms,
            rt,
            rt_prio,
            rt_lock,
        } => {
            rt::setup_rt_once(rt, rt_prio, rt_lock.unwrap_or_else(RtLock::os_default));
            let opts = RunOpts {
                ticks,
                auto,
                fire,
                az_rate,
                el_rate,
                vision_trace,
                rpm,
                period_ms,
            };
            run_turret(&cfg, &opts, cli.json)
        }
        Commands::SelfCheck => {
            let t = self_check(&cfg)?;
            if cli.json {
                println!("{}", run::telemetry_json(&t));
            } else {
                println!(
                    "self-check ok: az={:.2}deg el={:.2}deg",
                    t.azimuth.measured_deg, t.elevation.measured_deg
                );
            }
            Ok(())
        }
        Commands::Health => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "ok",
                    "version": env!("CARGO_PKG_VERSION"),
                    "config": cli.config.display().to_string(),
                    "period_ms": cfg.runner.period_ms,
                })
            );
            Ok(())
        }
    }
}

/// Console logs go to stderr (stdout carries telemetry); an optional JSON
/// file sink follows `[logging]` in the config.
fn init_tracing(json: bool, level: &str, logging: &turret_config::Logging) -> eyre::Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    if json {
        layers.push(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let file_level = logging.level.as_deref().unwrap_or("info");
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(file_level))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))
}
