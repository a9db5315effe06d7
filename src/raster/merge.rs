//! Recompose a directory of tile rasters into one mosaic.
//!
//! The output covers the bounding envelope of every tile extent at the
//! tiles' shared resolution; band count and dtype come from the first
//! tile discovered. Tiles must be axis-aligned. Overlaps should not occur
//! with tiles produced by the windower, but when they do the last tile
//! written wins.

use std::path::Path;

use anyhow::{Context, Result};
use gdal::Dataset;
use log::{debug, info};

use super::naming::discover_tiles;
use super::{copy_band_window, create_gtiff, gtiff_driver, open_raster, read_geo_transform};
use crate::models::GeoTransform;

struct SourceTile {
    ds: Dataset,
    transform: GeoTransform,
    width: usize,
    height: usize,
}

const RESOLUTION_TOLERANCE: f64 = 1e-9;

/// Merge every valid tile in `tile_dir` into a single raster at `output`.
/// Fails fast, before any output is created, when the directory holds no
/// valid tiles.
pub fn merge_tiles(tile_dir: &Path, output: &Path) -> Result<()> {
    let names = discover_tiles(tile_dir)?;
    anyhow::ensure!(
        !names.is_empty(),
        "no valid tiles found in {}",
        tile_dir.display()
    );

    let mut tiles = Vec::with_capacity(names.len());
    for (_, _, path) in &names {
        let ds = open_raster(path)?;
        let transform = read_geo_transform(&ds, path)?;
        anyhow::ensure!(
            transform.is_axis_aligned(),
            "tile {} has a rotated transform, cannot mosaic",
            path.display()
        );
        let (width, height) = ds.raster_size();
        tiles.push(SourceTile {
            ds,
            transform,
            width,
            height,
        });
    }

    let (px_w, px_h) = tiles[0].transform.pixel_size();
    for (tile, (_, _, path)) in tiles.iter().zip(&names) {
        let (w, h) = tile.transform.pixel_size();
        anyhow::ensure!(
            (w - px_w).abs() <= RESOLUTION_TOLERANCE && (h - px_h).abs() <= RESOLUTION_TOLERANCE,
            "tile {} resolution ({w}, {h}) differs from ({px_w}, {px_h})",
            path.display()
        );
    }

    // Bounding envelope of all tile extents.
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for tile in &tiles {
        let (x0, y0) = tile.transform.origin();
        let x1 = x0 + tile.width as f64 * px_w;
        let y1 = y0 + tile.height as f64 * px_h;
        x_min = x_min.min(x0.min(x1));
        x_max = x_max.max(x0.max(x1));
        y_min = y_min.min(y0.min(y1));
        y_max = y_max.max(y0.max(y1));
    }

    // Output origin is the envelope corner the pixel axes grow away from.
    let origin_x = if px_w >= 0.0 { x_min } else { x_max };
    let origin_y = if px_h >= 0.0 { y_min } else { y_max };
    let out_width = ((x_max - x_min) / px_w.abs()).round() as usize;
    let out_height = ((y_max - y_min) / px_h.abs()).round() as usize;
    let out_transform = GeoTransform::new([origin_x, px_w, 0.0, origin_y, 0.0, px_h]);

    let first = &tiles[0].ds;
    let band_count = first.raster_count();
    let band_type = first.rasterband(1)?.band_type();

    info!(
        "merging {} tiles into {} ({}x{} px, {} bands)",
        tiles.len(),
        output.display(),
        out_width,
        out_height,
        band_count,
    );

    let driver = gtiff_driver()?;
    let mut dst = create_gtiff(&driver, output, out_width, out_height, band_count as usize, band_type)?;
    dst.set_geo_transform(out_transform.as_array())?;
    if let Ok(srs) = first.spatial_ref() {
        dst.set_spatial_ref(&srs)?;
    }

    for (tile, (row, col, path)) in tiles.iter().zip(&names) {
        let (x0, y0) = tile.transform.origin();
        let col_off = ((x0 - origin_x) / px_w).round() as isize;
        let row_off = ((y0 - origin_y) / px_h).round() as isize;
        debug!(
            "placing tile ({row}, {col}) at pixel ({col_off}, {row_off}) from {}",
            path.display()
        );
        for band in 1..=band_count {
            let src_band = tile.ds.rasterband(band)?;
            let mut dst_band = dst.rasterband(band)?;
            copy_band_window(
                &src_band,
                &mut dst_band,
                (0, 0),
                (tile.width, tile.height),
                (col_off, row_off),
            )
            .with_context(|| format!("placing tile {} into mosaic", path.display()))?;
        }
    }

    Ok(())
}
