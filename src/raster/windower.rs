//! Slice a georeferenced raster into a grid of independent tile rasters.
//!
//! The partition is gap-free and non-overlapping; tiles in the last row
//! and column are clipped to the source extent, never padded. Each tile
//! carries its own derived transform and the source CRS, dtype and band
//! count unchanged.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use super::naming::tile_file_name;
use super::{copy_band_window, create_gtiff, gtiff_driver, open_raster, read_geo_transform};
use crate::models::TileWindow;

/// Write one tile raster per window and return the windows in row-major
/// order. Fatal if the source cannot be opened.
pub fn slice_into_tiles(
    input: &Path,
    out_dir: &Path,
    tile_height: usize,
    tile_width: usize,
) -> Result<Vec<TileWindow>> {
    anyhow::ensure!(
        tile_height > 0 && tile_width > 0,
        "tile size must be nonzero, got {tile_height}x{tile_width}"
    );

    let src = open_raster(input)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create tile directory {}", out_dir.display()))?;

    let (src_width, src_height) = src.raster_size();
    let band_count = src.raster_count();
    anyhow::ensure!(band_count > 0, "raster {} has no bands", input.display());

    let transform = read_geo_transform(&src, input)?;
    let srs = src.spatial_ref().ok();
    let band_type = src.rasterband(1)?.band_type();
    let driver = gtiff_driver()?;

    info!(
        "slicing {} ({}x{} px, {} bands) into {}x{} tiles",
        input.display(),
        src_width,
        src_height,
        band_count,
        tile_width,
        tile_height,
    );

    let mut windows = Vec::new();
    for row_off in (0..src_height).step_by(tile_height) {
        for col_off in (0..src_width).step_by(tile_width) {
            let height = tile_height.min(src_height - row_off);
            let width = tile_width.min(src_width - col_off);
            let out_path = out_dir.join(tile_file_name(row_off, col_off));
            debug!(
                "writing tile ({row_off}, {col_off}) {width}x{height} -> {}",
                out_path.display()
            );

            let mut dst = create_gtiff(&driver, &out_path, width, height, band_count as usize, band_type)?;
            dst.set_geo_transform(transform.windowed(col_off, row_off).as_array())?;
            if let Some(srs) = &srs {
                dst.set_spatial_ref(srs)?;
            }
            for band in 1..=band_count {
                let src_band = src.rasterband(band)?;
                let mut dst_band = dst.rasterband(band)?;
                copy_band_window(
                    &src_band,
                    &mut dst_band,
                    (col_off as isize, row_off as isize),
                    (width, height),
                    (0, 0),
                )?;
            }

            windows.push(TileWindow {
                row_off,
                col_off,
                width,
                height,
            });
        }
    }

    info!("sliced {} tiles into {}", windows.len(), out_dir.display());
    Ok(windows)
}
