//! Benchmarks for the pixelpress stages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pixelpress::{
    assemble, compress, AlphaPolicy, CanvasFitter, ChannelLayout, FitMode, PixelGrid, ResizeTarget,
};

/// A soft-edged disc on a transparent square, similar to a cut-out sprite.
fn sprite(size: u32) -> PixelGrid {
    let mut grid = PixelGrid::new(size, size, ChannelLayout::Rgba);
    let centre = size as f64 / 2.0;
    let radius = size as f64 / 3.0;
    for y in 0..size {
        for x in 0..size {
            let d = ((x as f64 - centre).powi(2) + (y as f64 - centre).powi(2)).sqrt();
            let alpha = ((radius - d) * 32.0).clamp(0.0, 255.0) as u8;
            grid.put_pixel(x, y, &[(x % 256) as u8, (y % 256) as u8, 128, alpha]);
        }
    }
    grid
}

// -- Compression benchmarks --

fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    let small = sprite(64);
    let large = sprite(512);

    group.bench_function("compress_64_binary", |b| {
        b.iter(|| compress(black_box(&small), 8, AlphaPolicy::default()).unwrap())
    });

    group.bench_function("compress_512_binary", |b| {
        b.iter(|| compress(black_box(&large), 8, AlphaPolicy::default()).unwrap())
    });

    group.bench_function("compress_512_smooth", |b| {
        b.iter(|| compress(black_box(&large), 8, AlphaPolicy::new(true)).unwrap())
    });

    group.finish();
}

// -- Fitting benchmarks --

fn bench_fitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitting");

    let image = sprite(256);
    let grow = CanvasFitter::new(FitMode::GrowWithBorder { border_percent: 10 });
    let fixed = CanvasFitter::new(FitMode::FixedCanvas { padding_percent: 5 });

    group.bench_function("grow_with_border_256", |b| {
        b.iter(|| grow.fit(black_box(&image)))
    });

    group.bench_function("fixed_canvas_256", |b| {
        b.iter(|| fixed.fit(black_box(&image)))
    });

    group.bench_function("fit_then_resize_256", |b| {
        let target = ResizeTarget::new(Some(128), None);
        b.iter(|| pixelpress::resize(&grow.fit(black_box(&image)), target).unwrap())
    });

    group.finish();
}

// -- Assembly benchmarks --

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    let frames: Vec<PixelGrid> = (0..16)
        .map(|_| compress(&sprite(128), 8, AlphaPolicy::default()).unwrap())
        .collect();

    group.bench_function("assemble_16_frames", |b| {
        b.iter(|| assemble(black_box(&frames)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_compression, bench_fitting, bench_assembly);
criterion_main!(benches);
