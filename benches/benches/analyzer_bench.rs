//! # Analyzer Benchmarks
//!
//! Measures frame analysis throughput across resolutions and pixel formats.
//!
//! Run: `cargo bench --bench analyzer_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use daylight_core::{ImageBuffer, PixelFormat};
use daylight_photonic::{AnalyzerConfig, FrameAnalyzer, LuminanceWeights};

fn gradient(width: u32, height: u32, format: PixelFormat) -> ImageBuffer {
    let bpp = format.bytes_per_pixel();
    let data = (0..width as usize * height as usize * bpp)
        .map(|i| (i % 251) as u8)
        .collect();
    ImageBuffer::new(width, height, format, data)
}

/// Benchmark analysis by resolution
fn bench_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_rgb8");
    let analyzer = FrameAnalyzer::new();

    for (width, height) in [(64, 48), (320, 240), (640, 480), (1280, 720)] {
        let frame = gradient(width, height, PixelFormat::Rgb8);
        group.throughput(Throughput::Elements(frame.pixel_count() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &frame,
            |b, frame| b.iter(|| black_box(analyzer.analyze(black_box(frame)))),
        );
    }

    group.finish();
}

/// Benchmark analysis by pixel format
fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_format");
    let analyzer = FrameAnalyzer::with_config(AnalyzerConfig {
        weights: LuminanceWeights::Rec709,
    });

    for format in [PixelFormat::Rgb8, PixelFormat::Bgr8, PixelFormat::Rgba8, PixelFormat::Gray8] {
        let frame = gradient(320, 240, format);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{format:?}")),
            &frame,
            |b, frame| b.iter(|| black_box(analyzer.analyze(black_box(frame)))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_resolutions, bench_formats);
criterion_main!(benches);
