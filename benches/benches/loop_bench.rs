//! # Control Loop Benchmarks
//!
//! Measures a full tick (capture → analysis → mapping → actuation) and event
//! bus throughput, without cadence waits.
//!
//! Run: `cargo bench --bench loop_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use daylight_actuator::{BackoffPolicy, SimulatedLamp};
use daylight_core::Color;
use daylight_orchestration::{ControlLoop, DaylightConfig, EventBus, EventFilter, LoopEvent};
use daylight_photonic::{SyntheticCamera, SyntheticConfig};

/// Benchmark one tick with in-memory camera and lamp
fn bench_tick(c: &mut Criterion) {
    let mut config = DaylightConfig::default();
    config.lamp.retry = BackoffPolicy::immediate(1);

    let camera = SyntheticCamera::with_config(SyntheticConfig {
        width: 160,
        height: 120,
        ..SyntheticConfig::default()
    })
    .unwrap();
    // Sem worker de deadline: mede só o pipeline
    let mut control = ControlLoop::unbounded(camera, SimulatedLamp::new(), &config).unwrap();

    c.bench_function("tick_160x120", |b| b.iter(|| black_box(control.tick())));
}

/// Benchmark event emission with subscribers and bounded history
fn bench_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_bus");
    let bus = EventBus::with_history(256);
    bus.subscribe(EventFilter::Completed, |event| {
        black_box(event);
    })
    .unwrap();
    bus.subscribe(EventFilter::Failures, |event| {
        black_box(event);
    })
    .unwrap();

    let event = LoopEvent::TickCompleted {
        tick: 1,
        luminance: 0.5,
        color: Color::new(200, 180, 150),
        written: true,
        attempts: 1,
    };

    group.bench_function("emit", |b| b.iter(|| bus.emit(black_box(event.clone()))));
    group.finish();
}

criterion_group!(benches, bench_tick, bench_events);
criterion_main!(benches);
