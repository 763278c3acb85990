//! Benchmarks for grade-rs operations.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use grade_core::ImageBuf;
use grade_lut::Lut3D;
use grade_ops::LookupFilter;

fn gamma(r: f32, g: f32, b: f32) -> [f32; 3] {
    [r.powf(2.2), g.powf(2.2), b.powf(2.2)]
}

/// Benchmark LUT construction at common cube sizes.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("lut3d_build");

    for size in [17usize, 33, 65] {
        group.throughput(Throughput::Elements((size * size * size) as u64));
        group.bench_with_input(BenchmarkId::new("from_fn_gamma", size), &size, |b, &s| {
            b.iter(|| Lut3D::from_fn(black_box(s), gamma).unwrap())
        });
    }

    group.finish();
}

/// Benchmark the per-pixel trilinear hot loop.
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("lut3d_apply");

    let lut = Lut3D::from_fn(33, gamma).unwrap();

    for pixels in [1024usize, 65536] {
        let src: Vec<f32> = (0..pixels * 4).map(|i| (i % 256) as f32).collect();
        group.throughput(Throughput::Elements(pixels as u64));

        group.bench_with_input(BenchmarkId::new("apply_slice_rgba", pixels), &src, |b, src| {
            b.iter(|| {
                let mut buffer = src.clone();
                lut.apply_slice(&mut buffer, 4, 255.0);
                buffer
            })
        });
    }

    group.finish();
}

/// Benchmark the full filter stage, cached-grid path.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_filter");

    let mut filter = LookupFilter::new(33).unwrap().with_transform(gamma);
    let src = ImageBuf::filled(256, 256, 4, 255.0, &[180.0, 90.0, 45.0, 255.0]).unwrap();

    // Prime the cache so the loop measures the pixel pass alone.
    let mut primed = src.clone();
    filter.process(&mut primed).unwrap();

    group.throughput(Throughput::Elements(src.pixel_count() as u64));
    group.bench_function("process_256x256_rgba", |b| {
        b.iter(|| {
            let mut image = src.clone();
            filter.process(&mut image).unwrap();
            image
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_apply, bench_filter);
criterion_main!(benches);
