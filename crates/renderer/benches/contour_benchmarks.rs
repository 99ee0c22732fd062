//! Benchmarks for contour line generation.
//!
//! Run with: cargo bench --package renderer --bench contour_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use renderer::contour::{
    connect_segments, generate_all_contours, march_squares, nice_levels, polar_contours,
};
use std::f64::consts::FRAC_PI_2;
use viz_common::PolarGrid;

/// Smooth field with hills and valleys.
fn generate_smooth_field(width: usize, height: usize) -> Vec<f64> {
    let mut data = vec![0.0f64; width * height];

    for y in 0..height {
        for x in 0..width {
            let fx = x as f64 / width as f64;
            let fy = y as f64 / height as f64;

            let v1 = (fx * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f64::consts::PI * 2.0).sin() * 10.0;

            data[y * width + x] = 50.0 + v1 + v2 + v3;
        }
    }
    data
}

/// Smooth field plus a deterministic high-frequency ripple (more segments).
fn generate_rippled_field(width: usize, height: usize) -> Vec<f64> {
    generate_smooth_field(width, height)
        .iter()
        .enumerate()
        .map(|(i, &v)| v + ((i as f64) * 12.9898).sin() * 5.0)
        .collect()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect()
}

/// Centered RMS difference field around a unit reference.
fn rms_field(n: usize) -> PolarGrid {
    PolarGrid::from_fn(linspace(0.0, FRAC_PI_2, n), linspace(0.0, 1.65, n), |theta, r| {
        (1.0 + r * r - 2.0 * r * theta.cos()).max(0.0).sqrt()
    })
}

// =============================================================================
// LEVEL SELECTION BENCHMARKS
// =============================================================================

fn bench_nice_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("nice_levels");

    let ranges = [
        (0.0, 1.93, 5, "rms_unit"),
        (0.0, 100.0, 10, "0-100_x10"),
        (-50.0, 50.0, 5, "neg50-50_x5"),
        (0.0102, 1.929, 20, "fine_x20"),
    ];

    for (min, max, count, name) in ranges {
        group.bench_with_input(
            BenchmarkId::new("levels", name),
            &(min, max, count),
            |b, &(min, max, count)| {
                b.iter(|| nice_levels(black_box(min), black_box(max), black_box(count)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// MARCHING SQUARES BENCHMARKS
// =============================================================================

fn bench_march_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("march_squares");

    let sizes = [(50, 50), (128, 128), (256, 256)];

    for (width, height) in sizes {
        let smooth_data = generate_smooth_field(width, height);
        let rippled_data = generate_rippled_field(width, height);

        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("smooth_single_level", format!("{}x{}", width, height)),
            &smooth_data,
            |b, data| {
                b.iter(|| march_squares(black_box(data), width, height, black_box(50.0)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("rippled_single_level", format!("{}x{}", width, height)),
            &rippled_data,
            |b, data| {
                b.iter(|| march_squares(black_box(data), width, height, black_box(50.0)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// SEGMENT CONNECTION BENCHMARKS
// =============================================================================

fn bench_connect_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect_segments");

    let sizes = [(128, 128), (256, 256)];

    for (width, height) in sizes {
        let smooth_data = generate_smooth_field(width, height);
        let segments = march_squares(&smooth_data, width, height, 50.0);

        group.throughput(Throughput::Elements(segments.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("smooth", format!("{}x{}_{}seg", width, height, segments.len())),
            &segments,
            |b, segs| {
                b.iter(|| connect_segments(black_box(segs.clone())));
            },
        );
    }

    group.finish();
}

// =============================================================================
// FULL CONTOUR GENERATION BENCHMARKS
// =============================================================================

fn bench_generate_all_contours(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_all_contours");
    group.sample_size(20);

    let sizes = [(128, 128), (256, 256)];

    for (width, height) in sizes {
        let data = generate_smooth_field(width, height);
        let few = [20.0, 40.0, 60.0, 80.0];
        let many: Vec<f64> = (0..20).map(|i| 10.0 + i as f64 * 5.0).collect();

        group.bench_with_input(
            BenchmarkId::new("4_levels", format!("{}x{}", width, height)),
            &data,
            |b, data| {
                b.iter(|| generate_all_contours(black_box(data), width, height, black_box(&few)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("20_levels", format!("{}x{}", width, height)),
            &data,
            |b, data| {
                b.iter(|| generate_all_contours(black_box(data), width, height, black_box(&many)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// POLAR CONTOUR BENCHMARKS
// =============================================================================

fn bench_polar_contours(c: &mut Criterion) {
    let mut group = c.benchmark_group("polar_contours");

    for n in [50, 100, 200] {
        let grid = rms_field(n);
        let levels = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5];

        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::new("rms_6_levels", n), &grid, |b, grid| {
            b.iter(|| polar_contours(black_box(grid), black_box(&levels)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_nice_levels,
    bench_march_squares,
    bench_connect_segments,
    bench_generate_all_contours,
    bench_polar_contours,
);
criterion_main!(benches);
