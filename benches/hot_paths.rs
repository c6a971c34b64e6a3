use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use skillmap::map::cluster::{self, GridConfig};
use skillmap::map::quadtree::PointQuadtree;

/// Deterministic pseudo-random scatter over a 400x200 pixel canvas
fn synthetic_points(n: usize) -> Vec<DVec2> {
    let mut state = 0x9e37_79b9_7f4a_7c15u64;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 32) & 0xffff) as f64 / 65535.0
    };
    (0..n)
        .map(|_| DVec2::new(next() * 400.0, next() * 200.0))
        .collect()
}

fn bench_quadtree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_build");
    for n in [1_000usize, 10_000, 100_000] {
        let points = synthetic_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, pts| {
            b.iter(|| PointQuadtree::build(black_box(pts)))
        });
    }
    group.finish();
}

fn bench_cluster_at_zoom(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_at_zoom");
    let points = synthetic_points(50_000);
    let grid = GridConfig::default();
    for zoom in [1.0f64, 4.0, 8.0] {
        group.bench_with_input(BenchmarkId::from_parameter(zoom), &zoom, |b, &zoom| {
            b.iter(|| cluster::cluster_at_zoom(black_box(&points), zoom, &grid, 400, 200))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_quadtree_build, bench_cluster_at_zoom);
criterion_main!(benches);
