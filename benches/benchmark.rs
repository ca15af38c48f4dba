use criterion::{black_box, criterion_group, criterion_main, Criterion};
use raster_tiler::processing::indices::NDVI;
use raster_tiler::processing::IndexCalculator;
use raster_tiler::tiling::{TileScheduler, TilingMode};
use raster_tiler::{extract_subrect, RasterDims, TypedBuffer};

/// Benchmark the core NDVI calculation on one 1024 x 1024 strip
fn benchmark_ndvi_calculation(c: &mut Criterion) {
    let dims = RasterDims::full(1024, 1024);
    let band_len = dims.len();

    // Blue, green, red, NIR
    let mut data = vec![0u16; band_len * 4];
    for i in 0..band_len {
        data[2 * band_len + i] = 2500 + (i % 50) as u16;
        data[3 * band_len + i] = 5000 + (i % 100) as u16;
    }
    let input = TypedBuffer::from_vec(dims, 4, data).unwrap();
    let mut output = TypedBuffer::<f32>::new(dims, 1);

    let ndvi = NDVI::default();

    c.bench_function("ndvi_core_calculation", |b| {
        b.iter(|| ndvi.calculate(black_box(&input), &mut output).unwrap())
    });
}

/// Benchmark trimming overlap lines off a padded strip
fn benchmark_subrect(c: &mut Criterion) {
    let buffer_window = RasterDims::new(0, 1023, 96, 231);
    let output_window = RasterDims::new(0, 1023, 100, 227);
    let data: Vec<f32> = (0..buffer_window.len()).map(|v| v as f32).collect();

    c.bench_function("extract_subrect_padded", |b| {
        b.iter(|| extract_subrect(black_box(&data), &buffer_window, &output_window).unwrap())
    });

    c.bench_function("extract_subrect_identity", |b| {
        b.iter(|| extract_subrect(black_box(&data), &buffer_window, &buffer_window).unwrap())
    });
}

/// Benchmark walking every tile of a large raster
fn benchmark_tile_windows(c: &mut Criterion) {
    let scheduler = TileScheduler::new(100_000, 10_000, 2, 4, 8 << 20, 8, TilingMode::AllBands).unwrap();

    c.bench_function("tile_windows_walk", |b| {
        b.iter(|| black_box(&scheduler).tiles().count())
    });
}

criterion_group!(benches, benchmark_ndvi_calculation, benchmark_subrect, benchmark_tile_windows);
criterion_main!(benches);
