//! Benchmarks for the renderer crate - ramp lookups, heatmaps and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use renderer::{
    gradient, png, ColorRamp, GridRenderer, HeatmapOptions, HeatmapRenderer, RenderRequest,
};

/// Sparse volume grid: most cells empty, the rest 0-3 m³.
fn generate_volume_grid(width: usize, height: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..width * height)
        .map(|_| {
            if rng.gen_bool(0.3) {
                rng.gen_range(0.05..3.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Random RGBA pixels, too many colors for a palette.
fn generate_rgba_data(width: usize, height: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut data = vec![0u8; width * height * 4];
    for chunk in data.chunks_mut(4) {
        chunk[0] = rng.gen();
        chunk[1] = rng.gen();
        chunk[2] = rng.gen();
        chunk[3] = 255;
    }
    data
}

fn bench_ramp_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("ramp_lookup");
    let ramp = ColorRamp::yl_or_rd().compile().expect("valid ramp");

    for (width, height) in [(39, 32), (256, 256), (1024, 1024)] {
        let data = generate_volume_grid(width, height);
        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("render_grid", format!("{}x{}", width, height)),
            &data,
            |b, data| {
                b.iter(|| {
                    gradient::render_grid(black_box(data), width, height, 0.0, 3.0, |t| {
                        ramp.color_at(t)
                    })
                });
            },
        );
    }

    group.finish();
}

fn bench_heatmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heatmap");
    let renderer = HeatmapRenderer::new(HeatmapOptions {
        annotate: false,
        ..HeatmapOptions::default()
    })
    .expect("valid options");

    for (width, height, cell_size) in [(39, 32, 20), (39, 32, 5), (100, 100, 10)] {
        let request = RenderRequest::new(generate_volume_grid(width, height), width, height);
        let renderer = HeatmapRenderer::new(HeatmapOptions {
            cell_size,
            ..renderer.options().clone()
        })
        .expect("valid options");

        group.bench_with_input(
            BenchmarkId::new("render_png", format!("{}x{}@{}", width, height, cell_size)),
            &request,
            |b, request| {
                b.iter(|| renderer.render(black_box(request)));
            },
        );
    }

    group.finish();
}

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    for (width, height) in [(256, 256), (812, 660)] {
        let rgba_data = generate_rgba_data(width, height);
        group.throughput(Throughput::Bytes((width * height * 4) as u64));

        group.bench_with_input(
            BenchmarkId::new("rgba_random", format!("{}x{}", width, height)),
            &rgba_data,
            |b, data| {
                b.iter(|| png::create_png(black_box(data), width, height));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("auto_random", format!("{}x{}", width, height)),
            &rgba_data,
            |b, data| {
                b.iter(|| png::create_png_auto(black_box(data), width, height));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ramp_lookup, bench_heatmap, bench_png_encoding);
criterion_main!(benches);
