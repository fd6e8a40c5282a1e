//! # Mapper Benchmarks
//!
//! Measures strategy evaluation and smoothing cost per tick.
//!
//! Run: `cargo bench --bench mapper_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use daylight_core::{Color, LightMeasurement};
use daylight_mapper::{smooth, ColorMapper, MapperConfig, StrategyKind};

/// Benchmark `map` for each strategy
fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");
    let measurement = LightMeasurement::new(0.42, Color::new(180, 160, 120));
    let previous = Color::new(120, 90, 40);

    for kind in [StrategyKind::DaylightCurve, StrategyKind::CameraTint] {
        let mapper = ColorMapper::new(MapperConfig {
            strategy: kind,
            ..MapperConfig::default()
        })
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(kind.as_str()), &mapper, |b, mapper| {
            b.iter(|| black_box(mapper.map(black_box(&measurement), black_box(previous))))
        });
    }

    group.finish();
}

/// Benchmark a sweep of stateful mapping over a day cycle
fn bench_advance(c: &mut Criterion) {
    let measurements: Vec<LightMeasurement> = (0..256)
        .map(|i| {
            let level = i as f32 / 255.0;
            let v = i as u8;
            LightMeasurement::new(level, Color::new(v, v, v))
        })
        .collect();

    c.bench_function("advance_256", |b| {
        b.iter(|| {
            let mut mapper = ColorMapper::new(MapperConfig::default()).unwrap();
            for m in &measurements {
                black_box(mapper.advance(m));
            }
        })
    });

    c.bench_function("smooth", |b| {
        b.iter(|| black_box(smooth(black_box(Color::BLACK), black_box(Color::WHITE), 0.35)))
    });
}

criterion_group!(benches, bench_strategies, bench_advance);
criterion_main!(benches);
