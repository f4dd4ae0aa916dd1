use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use turret_core::filter::SmoothingWindow;
use turret_core::{GearedAxisConfig, Turret, TurretCfg, TurretCommand};
use turret_hardware::{
    ScriptedVision, SimPercentOutput, SimPositionActuator, SimVelocityActuator,
};
use turret_traits::VisionSample;

// Vision trace that wanders left and right with periodic target loss.
fn synth_frames(n: usize) -> Vec<VisionSample> {
    (0..n)
        .map(|i| {
            let t = i as f64 / 50.0;
            VisionSample {
                valid: i % 17 != 0,
                azimuth_offset_deg: 3.0 * t.sin(),
                elevation_offset_deg: 0.5 * t.cos(),
                ballistic_velocity_fps: 35.0 + t.sin(),
            }
        })
        .collect()
}

fn sim_turret(frames: Vec<VisionSample>) -> Turret {
    let axis = GearedAxisConfig {
        ticks_per_revolution: 4096.0,
        gear_ratio: 0.1,
        soft_limit_deg: Some((-90.0, 90.0)),
        default_turn_rate_deg_per_s: 45.0,
    };
    let mut cfg = TurretCfg {
        azimuth: axis.clone(),
        elevation: axis,
        ..TurretCfg::default()
    };
    cfg.aim.use_filter = true;
    Turret::builder()
        .with_axes(
            SimPositionActuator::new("azimuth", 400.0),
            SimPositionActuator::new("elevation", 400.0),
        )
        .with_launcher(
            SimVelocityActuator::new("flywheel", 0.3),
            SimPercentOutput::new("feeder"),
        )
        .with_transfer(SimPercentOutput::new("ball_transfer"))
        .with_vision(ScriptedVision::new(frames))
        .with_config(cfg)
        .build()
        .expect("bench turret")
}

pub fn bench_auto_ticks(c: &mut Criterion) {
    let frames = synth_frames(1000);
    let cmd = TurretCommand::auto().firing(true);
    c.bench_function("auto_fire_1000_ticks", |b| {
        b.iter_batched(
            || sim_turret(frames.clone()),
            |mut turret| {
                for _ in 0..1000 {
                    black_box(turret.periodic(0.02, &cmd).expect("tick"));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn bench_smoothing(c: &mut Criterion) {
    let samples: Vec<f64> = synth_frames(4096)
        .iter()
        .map(|f| f.azimuth_offset_deg)
        .collect();
    c.bench_function("smoothing_window_5", |b| {
        b.iter(|| {
            let mut w = SmoothingWindow::new(5);
            let mut acc = 0.0;
            for &s in &samples {
                acc += w.push(black_box(s));
            }
            acc
        })
    });
}

criterion_group!(benches, bench_auto_ticks, bench_smoothing);
criterion_main!(benches);
