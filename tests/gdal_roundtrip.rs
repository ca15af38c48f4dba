// tests/gdal_roundtrip.rs
use std::path::Path;

use gdal::raster::Buffer;
use gdal::DriverManager;
use tempfile::TempDir;

use raster_tiler::config::TilingConfig;
use raster_tiler::io::{Access, CreateOptions, GdalRaster, RasterStore};
use raster_tiler::processing::indices::NDVI;
use raster_tiler::processing::TiledProcessor;
use raster_tiler::{DataType, RasterDims, TileScheduler, TilerError, TilingMode};

const GEO_TRANSFORM: [f64; 6] = [500_000.0, 10.0, 0.0, 4_650_000.0, 0.0, -10.0];

/// Writes a 4-band UInt16 GeoTIFF whose band `b` holds `b * 1000 + line`.
fn write_multispectral(path: &Path, samples: usize, lines: usize) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = driver
        .create_with_band_type::<u16, _>(path, samples, lines, 4)
        .unwrap();
    dataset.set_geo_transform(&GEO_TRANSFORM).unwrap();

    for band in 1..=4 {
        let data: Vec<u16> = (0..lines)
            .flat_map(|line| std::iter::repeat((band * 1000 + line) as u16).take(samples))
            .collect();
        let mut buffer = Buffer::new((samples, lines), data);
        dataset
            .rasterband(band)
            .unwrap()
            .write((0, 0), (samples, lines), &mut buffer)
            .unwrap();
    }
}

#[test]
fn test_window_roundtrip_u16() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roundtrip_u16.tif");
    let dims = RasterDims::full(400, 400);

    let mut raster = GdalRaster::create(&path, &dims, 4, DataType::U16, "GTiff", &CreateOptions::default(), None)
        .unwrap();
    let band_values = |band: usize| -> Vec<u16> {
        (0..dims.len()).map(|i| ((i * 7 + band * 131) % 65_536) as u16).collect()
    };
    for band in 1..=4 {
        raster.write_window(band, &dims, &band_values(band)).unwrap();
    }
    raster.close().unwrap();

    let raster = GdalRaster::open(&path, Access::ReadOnly).unwrap();
    assert_eq!(raster.dimensions(), (400, 400, 4));
    assert_eq!(raster.data_type(), DataType::U16);

    let mut read_back = vec![0u16; dims.len()];
    for band in 1..=4 {
        raster.read_window(band, &dims, &mut read_back).unwrap();
        assert_eq!(read_back, band_values(band), "band {band}");
    }

    // Interior window of band 2
    let values = band_values(2);
    let window = RasterDims::new(5, 9, 3, 4);
    let mut part = vec![0u16; window.len()];
    raster.read_window(2, &window, &mut part).unwrap();
    assert_eq!(part[0], values[3 * 400 + 5]);
    assert_eq!(part[9], values[4 * 400 + 9]);

    // 800 bytes per line: 100-line strips
    let scheduler = TileScheduler::from_store(&raster, 80_000, 0, TilingMode::SingleBand).unwrap();
    assert_eq!(scheduler.tile_count(), 4);
    assert_eq!(
        scheduler.tile_windows(3).unwrap().output,
        RasterDims::new(0, 399, 300, 399)
    );
}

#[test]
fn test_compressed_f32_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roundtrip_f32.tif");
    let dims = RasterDims::full(400, 400);
    let options = CreateOptions {
        compress: "DEFLATE".to_string(),
        compress_level: 6,
        tiled: true,
    };

    let mut raster = GdalRaster::create(&path, &dims, 1, DataType::F32, "GTiff", &options, None).unwrap();
    let values: Vec<f32> = (0..dims.len()).map(|v| v as f32 * 0.25 - 100.0).collect();
    raster.write_window(1, &dims, &values).unwrap();
    raster.close().unwrap();

    let raster = GdalRaster::open(&path, Access::ReadOnly).unwrap();
    let mut read_back = vec![0f32; dims.len()];
    raster.read_window(1, &dims, &mut read_back).unwrap();
    assert_eq!(read_back, values);
}

#[test]
fn test_window_and_band_checks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checks.tif");
    let mut raster = GdalRaster::create(
        &path,
        &RasterDims::full(10, 10),
        1,
        DataType::U8,
        "GTiff",
        &CreateOptions::default(),
        None,
    )
    .unwrap();

    let mut dst = vec![0u8; 200];
    assert!(matches!(
        raster.read_window(1, &RasterDims::new(0, 10, 0, 9), &mut dst),
        Err(TilerError::WindowOutOfRaster { .. })
    ));
    assert!(matches!(
        raster.read_window(2, &RasterDims::full(10, 10), &mut dst),
        Err(TilerError::BandOutOfRange { band: 2, nbands: 1 })
    ));
    assert!(matches!(
        raster.write_window(1, &RasterDims::full(10, 10), &[0u8; 50]),
        Err(TilerError::SourceTooSmall { expected: 100, actual: 50 })
    ));
}

#[test]
fn test_unknown_driver() {
    let dir = TempDir::new().unwrap();
    let result = GdalRaster::create(
        dir.path().join("x.bin"),
        &RasterDims::full(4, 4),
        1,
        DataType::F32,
        "NoSuchDriver",
        &CreateOptions::default(),
        None,
    );
    assert!(matches!(result, Err(TilerError::Gdal(_))));
}

#[test]
fn test_open_missing_file() {
    let result = GdalRaster::open("/nonexistent/input.tif", Access::ReadOnly);
    assert!(matches!(result, Err(TilerError::Gdal(_))));
}

#[test]
fn test_ndvi_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("ms.tif");
    let output_path = dir.path().join("ndvi.tif");
    write_multispectral(&input_path, 40, 64);

    let processor = TiledProcessor::new(TilingConfig {
        // 80 bytes per line: 10 lines per tile, 8 once two context lines are reserved
        memory_budget: 800,
        overlap: 1,
        mode: TilingMode::SingleBand,
    });
    let scheduler = processor
        .process(&NDVI::default(), &input_path, &output_path, "GTiff", &CreateOptions::default())
        .unwrap();
    assert_eq!(scheduler.strip_height(), 8);
    assert_eq!(scheduler.tile_count(), 8);

    let output = GdalRaster::open(&output_path, Access::ReadOnly).unwrap();
    assert_eq!(output.dimensions(), (40, 64, 1));
    assert_eq!(output.data_type(), DataType::F32);
    assert_eq!(output.geo_transform(), Some(GEO_TRANSFORM));
    assert_eq!(output.bounds(), ((500_000.0, 4_650_000.0), (500_400.0, 4_649_360.0)));

    let mut values = vec![0f32; 40 * 64];
    output.read_window(1, &output.dims(), &mut values).unwrap();
    for line in 0..64 {
        let red = (3000 + line) as f32;
        let nir = (4000 + line) as f32;
        let expected = (nir - red) / (nir + red + 1e-6);
        for sample in 0..40 {
            let got = values[line * 40 + sample];
            assert!((got - expected).abs() < 1e-6, "line {line} sample {sample}: {got} != {expected}");
        }
    }
}

#[test]
fn test_ndvi_rejects_three_band_input() {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("rgb.tif");
    let raster = GdalRaster::create(
        &input_path,
        &RasterDims::full(8, 8),
        3,
        DataType::U8,
        "GTiff",
        &CreateOptions::default(),
        None,
    )
    .unwrap();
    raster.close().unwrap();

    let err = TiledProcessor::new(TilingConfig::default())
        .process(
            &NDVI::default(),
            &input_path,
            &dir.path().join("out.tif"),
            "GTiff",
            &CreateOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, TilerError::NotEnoughBands { required: 4, available: 3 }));
    assert!(!dir.path().join("out.tif").exists());
}

#[test]
fn test_overlap_too_large_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("ms.tif");
    let output_path = dir.path().join("ndvi.tif");
    write_multispectral(&input_path, 40, 64);

    // 80 bytes per line: 10 lines fit, 2 * 5 context lines leave none
    let err = TiledProcessor::new(TilingConfig {
        memory_budget: 800,
        overlap: 5,
        mode: TilingMode::SingleBand,
    })
    .process(&NDVI::default(), &input_path, &output_path, "GTiff", &CreateOptions::default())
    .unwrap_err();

    assert!(matches!(err, TilerError::OverlapTooLarge { lines_per_tile: 10, .. }));
    assert!(!output_path.exists());
}
