pub mod annotate;
pub mod merge;
pub mod naming;
pub mod windower;

use std::path::Path;

use anyhow::{Context, Result};
use gdal::raster::{Buffer, GdalDataType, GdalType, RasterBand};
use gdal::{Dataset, Driver, DriverManager};

use crate::models::GeoTransform;

pub(crate) fn open_raster(path: &Path) -> Result<Dataset> {
    Dataset::open(path).with_context(|| format!("cannot open raster {}", path.display()))
}

pub(crate) fn read_geo_transform(ds: &Dataset, path: &Path) -> Result<GeoTransform> {
    let gt = ds
        .geo_transform()
        .with_context(|| format!("raster {} has no geotransform", path.display()))?;
    Ok(GeoTransform::new(gt))
}

pub(crate) fn gtiff_driver() -> Result<Driver> {
    DriverManager::get_driver_by_name("GTiff").context("GTiff driver unavailable")
}

/// Create a GTiff dataset whose bands store the given GDAL data type.
/// `create_with_band_type` wants the type at compile time, so runtime
/// types go through this match.
pub(crate) fn create_gtiff(
    driver: &Driver,
    path: &Path,
    width: usize,
    height: usize,
    bands: usize,
    band_type: GdalDataType,
) -> Result<Dataset> {
    let (w, h, n) = (width as isize, height as isize, bands as isize);
    let ds = match band_type {
        GdalDataType::UInt8 => driver.create_with_band_type::<u8, _>(path, w, h, n),
        GdalDataType::UInt16 => driver.create_with_band_type::<u16, _>(path, w, h, n),
        GdalDataType::Int16 => driver.create_with_band_type::<i16, _>(path, w, h, n),
        GdalDataType::UInt32 => driver.create_with_band_type::<u32, _>(path, w, h, n),
        GdalDataType::Int32 => driver.create_with_band_type::<i32, _>(path, w, h, n),
        GdalDataType::Float32 => driver.create_with_band_type::<f32, _>(path, w, h, n),
        GdalDataType::Float64 => driver.create_with_band_type::<f64, _>(path, w, h, n),
        other => anyhow::bail!("unsupported raster data type {other:?}"),
    };
    ds.with_context(|| format!("cannot create raster {}", path.display()))
}

/// Copy one band's pixel window between datasets in the band's own
/// storage type.
pub(crate) fn copy_band_window(
    src: &RasterBand,
    dst: &mut RasterBand,
    src_window: (isize, isize),
    size: (usize, usize),
    dst_window: (isize, isize),
) -> Result<()> {
    match src.band_type() {
        GdalDataType::UInt8 => copy_typed::<u8>(src, dst, src_window, size, dst_window),
        GdalDataType::UInt16 => copy_typed::<u16>(src, dst, src_window, size, dst_window),
        GdalDataType::Int16 => copy_typed::<i16>(src, dst, src_window, size, dst_window),
        GdalDataType::UInt32 => copy_typed::<u32>(src, dst, src_window, size, dst_window),
        GdalDataType::Int32 => copy_typed::<i32>(src, dst, src_window, size, dst_window),
        GdalDataType::Float32 => copy_typed::<f32>(src, dst, src_window, size, dst_window),
        GdalDataType::Float64 => copy_typed::<f64>(src, dst, src_window, size, dst_window),
        other => anyhow::bail!("unsupported raster data type {other:?}"),
    }
}

fn copy_typed<T: GdalType + Copy>(
    src: &RasterBand,
    dst: &mut RasterBand,
    src_window: (isize, isize),
    size: (usize, usize),
    dst_window: (isize, isize),
) -> Result<()> {
    let mut buffer: Buffer<T> = src.read_as(src_window, size, size, None)?;
    dst.write(dst_window, size, &mut buffer)?;
    Ok(())
}
