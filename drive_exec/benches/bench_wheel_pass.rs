//! # Wheel Control Pass Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use comms_if::eqpt::WheelId;
use drive_lib::{
    duty_map::VelDutyCurve,
    params::DriveExecParams,
    vel_est::EncoderSample,
    wheel_ctrl::{InputData, WheelCtrl},
};
use util::module::State;

fn wheel_pass_benchmark(c: &mut Criterion) {
    // ---- Build a wheel from the shipped parameters ----

    let params: DriveExecParams =
        util::params::from_str(include_str!("../../params/drive_exec.toml")).unwrap();
    let curve = Arc::new(VelDutyCurve::from_params(&params.duty_map).unwrap());

    let mut ctrl = WheelCtrl::new(
        params.wheel(WheelId::A).unwrap(),
        &params.encoder,
        curve.clone(),
    )
    .unwrap();

    let mut counter = 0u32;
    let mut time_ms = 0u32;

    // Bench a full pass, counter wrapping at the auto-reload value
    c.bench_function("WheelCtrl::proc", |b| {
        b.iter(|| {
            counter = (counter + 37) % (params.encoder.counter_auto_reload + 1);
            time_ms = time_ms.wrapping_add(10);

            ctrl.proc(black_box(&InputData {
                target_rpm: 15.0,
                sample: Some(EncoderSample { counter, time_ms }),
            }))
            .unwrap()
        })
    });

    // Bench the curve lookup across the whole table
    c.bench_function("VelDutyCurve::map", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            let mut v = -70.0f32;
            while v < 70.0 {
                sum += curve.map(black_box(v));
                v += 1.0;
            }
            sum
        })
    });
}

criterion_group!(benches, wheel_pass_benchmark);
criterion_main!(benches);
