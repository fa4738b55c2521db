use criterion::{criterion_group, criterion_main, Criterion};
use horizon::{
    geo::geometry::Coord, ElevationGrid, GeoTransform, Geodesic, Haversine, Horizon,
    PanoramaParams, ProfileParams,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// A 3 arc-second, one degree square of synthetic ridges.
#[allow(clippy::cast_precision_loss)]
fn ridges() -> ElevationGrid {
    const N: usize = 1201;
    let spacing = 3.0 / 3600.0;
    let samples: Vec<f32> = (0..N * N)
        .map(|i| {
            let (row, col) = ((i / N) as f32, (i % N) as f32);
            1000.0 + 400.0 * (row / 40.0).sin() * (col / 55.0).cos()
        })
        .collect();
    let transform = GeoTransform::new(
        Coord {
            x: -72.0 - spacing / 2.0,
            y: 45.0 + spacing / 2.0,
        },
        spacing,
        -spacing,
    );
    ElevationGrid::new(samples, N, N, transform).unwrap()
}

const MT_WASHINGTON: Coord = Coord {
    y: 44.2705,
    x: -71.30325,
};

fn horizon_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("Horizon Profile");
    let grid = ridges();
    let params = ProfileParams::builder()
        .step_count(1000)
        .max_distance(100_000.0)
        .build()
        .unwrap();

    group.bench_with_input("geodesic", &(&grid, params), |b, (g, p)| {
        b.iter(|| Horizon::new(Geodesic).profile(g, MT_WASHINGTON, 45.0, p).unwrap())
    });
    group.bench_with_input("haversine", &(&grid, params), |b, (g, p)| {
        b.iter(|| Horizon::new(Haversine).profile(g, MT_WASHINGTON, 45.0, p).unwrap())
    });
}

fn horizon_panorama(c: &mut Criterion) {
    let mut group = c.benchmark_group("Horizon Panorama");
    group.sample_size(10);
    let grid = ridges();
    let params = PanoramaParams::builder()
        .azimuth_count(360)
        .step_count(200)
        .max_distance(100_000.0)
        .build()
        .unwrap();

    group.bench_with_input("360", &(&grid, params), |b, (g, p)| {
        b.iter(|| Horizon::new(Geodesic).panorama(g, MT_WASHINGTON, p).unwrap())
    });
}

criterion_group!(benches, horizon_profile, horizon_panorama);
criterion_main!(benches);
