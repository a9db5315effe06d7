//! Render tiles as 8-bit RGB imagery and burn detection boxes onto them.
//!
//! Detection and visualization both operate in a 3-band color space: tiles
//! with more bands keep only the first three, a single-band tile is
//! replicated across the channels.

use std::path::Path;

use anyhow::{Context, Result};
use gdal::raster::Buffer;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::{create_gtiff, gtiff_driver, open_raster, read_geo_transform};
use crate::models::DetectionBox;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_STROKE: i32 = 3;

/// Read a tile's imagery as an RGB image.
pub fn render_rgb(tile_path: &Path) -> Result<RgbImage> {
    let ds = open_raster(tile_path)?;
    let (width, height) = ds.raster_size();
    let band_count = ds.raster_count();
    anyhow::ensure!(band_count > 0, "tile {} has no bands", tile_path.display());

    let mut planes: Vec<Vec<u8>> = Vec::new();
    for band in 1..=band_count.min(3) {
        let buffer: Buffer<u8> =
            ds.rasterband(band)?
                .read_as((0, 0), (width, height), (width, height), None)?;
        planes.push(buffer.data);
    }

    let mut img = RgbImage::new(width as u32, height as u32);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let r = planes[0][i];
        let g = planes.get(1).map_or(r, |p| p[i]);
        let b = planes.get(2).map_or(r, |p| p[i]);
        *pixel = Rgb([r, g, b]);
    }
    Ok(img)
}

/// Draw each box as a closed hollow rectangle with a 3-pixel stroke,
/// clamped to the image bounds. Zero boxes leave the image untouched.
pub fn draw_boxes(img: &mut RgbImage, boxes: &[DetectionBox]) {
    let (img_w, img_h) = (img.width() as i32, img.height() as i32);
    for b in boxes {
        let x1 = (b.x1 as i32).clamp(0, img_w);
        let y1 = (b.y1 as i32).clamp(0, img_h);
        let x2 = (b.x2 as i32).clamp(0, img_w);
        let y2 = (b.y2 as i32).clamp(0, img_h);
        // Stroke grows inward so the outer edge stays on the box outline.
        for t in 0..BOX_STROKE {
            let w = (x2 - x1) - 2 * t;
            let h = (y2 - y1) - 2 * t;
            if w < 1 || h < 1 {
                break;
            }
            let rect = Rect::at(x1 + t, y1 + t).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(img, rect, BOX_COLOR);
        }
    }
}

/// Persist an annotated tile with the same footprint as the source tile:
/// transform, CRS and dtype are carried over, the band count becomes the
/// three bands the drawing step produced.
pub fn write_annotated_tile(src_tile: &Path, out_path: &Path, img: &RgbImage) -> Result<()> {
    let src = open_raster(src_tile)?;
    let (width, height) = src.raster_size();
    anyhow::ensure!(
        img.width() as usize == width && img.height() as usize == height,
        "annotated image is {}x{} but tile {} is {}x{}",
        img.width(),
        img.height(),
        src_tile.display(),
        width,
        height,
    );

    let transform = read_geo_transform(&src, src_tile)?;
    let band_type = src.rasterband(1)?.band_type();
    let driver = gtiff_driver()?;

    let mut dst = create_gtiff(&driver, out_path, width, height, 3, band_type)?;
    dst.set_geo_transform(transform.as_array())?;
    if let Ok(srs) = src.spatial_ref() {
        dst.set_spatial_ref(&srs)?;
    }

    for channel in 0..3usize {
        let plane: Vec<u8> = img.pixels().map(|p| p.0[channel]).collect();
        let mut buffer = Buffer::new((width, height), plane);
        dst.rasterband(channel as isize + 1)?
            .write((0, 0), (width, height), &mut buffer)
            .with_context(|| format!("writing annotated tile {}", out_path.display()))?;
    }
    Ok(())
}
