//! Benchmarks for drawing and exporting a full quarter-disc diagram.
//!
//! Run with: cargo bench --package renderer --bench diagram_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use renderer::{png, FigureConfig, SvgSurface};
use std::f64::consts::FRAC_PI_2;
use viz_common::{
    AxisSpec, Color, Coord, Dash, FrameSpec, LineStyle, MarkerShape, MarkerStyle, PolarGrid,
    SubplotSpec, Surface, TextContent, TextItem, TextStyle, Tick,
};

const STD_MAX: f64 = 1.65;

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect()
}

fn frame_spec() -> FrameSpec {
    let corr_ticks = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 0.99, 1.0]
        .iter()
        .map(|&c: &f64| Tick {
            value: c.acos(),
            label: format!("{}", c),
        })
        .collect();
    let std_ticks: Vec<Tick> = linspace(0.0, 1.5, 7)
        .into_iter()
        .map(|v| Tick {
            value: v,
            label: format!("{:.2}", v),
        })
        .collect();

    FrameSpec {
        theta_range: (0.0, FRAC_PI_2),
        r_range: (0.0, STD_MAX),
        subplot: SubplotSpec::default(),
        top: AxisSpec {
            ticks: corr_ticks,
            show_ticklabels: true,
            label: Some("Correlation".to_string()),
            ..AxisSpec::default()
        },
        bottom: AxisSpec {
            visible: false,
            ..AxisSpec::default()
        },
        left: AxisSpec {
            ticks: std_ticks.clone(),
            show_ticklabels: true,
            label: Some("Standard Deviation".to_string()),
            ..AxisSpec::default()
        },
        right: AxisSpec {
            ticks: std_ticks,
            ..AxisSpec::default()
        },
    }
}

/// Draw a diagram with `sets` sample sets of `points` points each.
fn draw_diagram(sets: usize, points: usize) -> SvgSurface {
    let mut surface = SvgSurface::default();
    let frame = match surface.add_frame(&frame_spec()) {
        Ok(frame) => frame,
        Err(e) => panic!("frame rejected: {}", e),
    };

    let reference = [Coord::data(0.0, 1.0), Coord::data(FRAC_PI_2, 1.0)];
    let _ = surface.plot(
        frame,
        &reference,
        &LineStyle::new(Color::BLACK, 1.0, Dash::long_dash()),
    );

    let grid = PolarGrid::from_fn(
        linspace(0.0, FRAC_PI_2, 50),
        linspace(0.0, STD_MAX, 50),
        |theta, r| (1.0 + r * r - 2.0 * r * theta.cos()).max(0.0).sqrt(),
    );
    let _ = surface.contour(frame, &grid, &[0.5, 1.0, 1.5], &LineStyle::default());

    let shapes = [MarkerShape::Circle, MarkerShape::Diamond, MarkerShape::Square];
    for set in 0..sets {
        let coords: Vec<Coord> = (0..points)
            .map(|i| {
                let corr = 0.5 + 0.49 * (i as f64 / points as f64);
                let std = 0.6 + 0.8 * ((i + set) % points) as f64 / points as f64;
                Coord::data(corr.acos(), std)
            })
            .collect();
        let marker = MarkerStyle {
            shape: shapes[set % shapes.len()],
            size: 60.0,
            ..MarkerStyle::default()
        };
        let _ = surface.scatter(frame, &coords, &marker);

        for (i, &at) in coords.iter().enumerate() {
            let item = TextItem::new(
                at,
                TextContent::plain(format!("{}", i + 1)),
                TextStyle::sized(14.0),
            )
            .with_offset(5.0, 5.0);
            let _ = surface.text(frame, &item);
        }
    }

    surface
}

// =============================================================================
// SVG DOCUMENT BENCHMARKS
// =============================================================================

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_diagram");

    for (sets, points) in [(2, 3), (4, 10), (8, 50)] {
        group.throughput(Throughput::Elements((sets * points) as u64));
        group.bench_with_input(
            BenchmarkId::new("sets_x_points", format!("{}x{}", sets, points)),
            &(sets, points),
            |b, &(sets, points)| {
                b.iter(|| draw_diagram(black_box(sets), black_box(points)));
            },
        );
    }

    group.finish();
}

fn bench_to_svg_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_svg_string");

    for (sets, points) in [(2, 3), (8, 50)] {
        let surface = draw_diagram(sets, points);
        group.bench_function(format!("{}x{}", sets, points), |b| {
            b.iter(|| black_box(&surface).to_svg_string());
        });
    }

    group.finish();
}

// =============================================================================
// RASTER EXPORT BENCHMARKS
// =============================================================================

fn bench_to_png(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_png");
    group.sample_size(10);

    for dpi in [50.0, 100.0] {
        let mut surface = match SvgSurface::new(FigureConfig {
            dpi,
            ..FigureConfig::default()
        }) {
            Ok(surface) => surface,
            Err(e) => panic!("figure rejected: {}", e),
        };
        if let Ok(frame) = surface.add_frame(&frame_spec()) {
            let _ = surface.scatter(
                frame,
                &[Coord::data(0.5, 1.0), Coord::data(0.3, 1.2)],
                &MarkerStyle::default(),
            );
        }

        group.bench_with_input(BenchmarkId::new("dpi", dpi as u32), &surface, |b, s| {
            b.iter(|| s.to_png());
        });
    }

    group.finish();
}

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    // Mostly white page with a few flat colors, like a rasterized diagram
    let (width, height) = (800, 800);
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let px: [u8; 4] = if (x + y) % 97 == 0 {
                [0, 0, 0, 255]
            } else if x % 100 == 0 {
                [211, 211, 211, 255]
            } else {
                [255, 255, 255, 255]
            };
            pixels.extend_from_slice(&px);
        }
    }

    group.throughput(Throughput::Elements((width * height) as u64));
    group.bench_function("auto_800x800", |b| {
        b.iter(|| png::create_png_auto(black_box(&pixels), width, height));
    });
    group.bench_function("rgba_800x800", |b| {
        b.iter(|| png::create_png(black_box(&pixels), width, height));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_draw,
    bench_to_svg_string,
    bench_to_png,
    bench_png_encoding,
);
criterion_main!(benches);
