use std::path::Path;

use anyhow::Result;
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};

pub const TEST_EPSG: u32 = 32633;

/// Deterministic pixel pattern so tile contents can be checked after
/// slicing and merging.
pub fn pattern(col: usize, row: usize, band: usize) -> u8 {
    ((row * 7 + col * 3 + band * 11) % 251) as u8
}

/// Write a small 8-bit GeoTIFF with the deterministic pattern, the given
/// geotransform and a UTM spatial reference.
pub fn create_test_raster(
    path: &Path,
    width: usize,
    height: usize,
    bands: usize,
    gt: [f64; 6],
) -> Result<()> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut ds = driver.create_with_band_type::<u8, _>(
        path,
        width as isize,
        height as isize,
        bands as isize,
    )?;
    ds.set_geo_transform(&gt)?;
    ds.set_spatial_ref(&SpatialRef::from_epsg(TEST_EPSG)?)?;
    for band in 1..=bands {
        let data: Vec<u8> = (0..width * height)
            .map(|i| pattern(i % width, i / width, band))
            .collect();
        let mut buffer = Buffer::new((width, height), data);
        ds.rasterband(band as isize)?
            .write((0, 0), (width, height), &mut buffer)?;
    }
    Ok(())
}

/// Read one full band of a raster as bytes, plus its dimensions.
pub fn read_band(path: &Path, band: isize) -> Result<(usize, usize, Vec<u8>)> {
    let ds = Dataset::open(path)?;
    let (width, height) = ds.raster_size();
    let buffer: Buffer<u8> =
        ds.rasterband(band)?
            .read_as((0, 0), (width, height), (width, height), None)?;
    Ok((width, height, buffer.data))
}

pub fn geo_transform(path: &Path) -> Result<[f64; 6]> {
    Ok(Dataset::open(path)?.geo_transform()?)
}

pub fn raster_size(path: &Path) -> Result<(usize, usize)> {
    Ok(Dataset::open(path)?.raster_size())
}

pub fn band_count(path: &Path) -> Result<isize> {
    Ok(Dataset::open(path)?.raster_count())
}

pub fn epsg_code(path: &Path) -> Result<i32> {
    Ok(Dataset::open(path)?.spatial_ref()?.auth_code()?)
}
