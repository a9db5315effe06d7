//! Tile filename codec and discovery.
//!
//! A tile's identity is its pixel offset pair; the filename round-trips it:
//! `tile_<rowOff>_<colOff>.tif`. Anything else in a tile directory is
//! silently skipped, which is what lets the merge step share a directory
//! with temp files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

/// Fixed first token of every tile filename.
pub const TILE_TAG: &str = "tile";

const TILE_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// Canonical filename for the tile at pixel offset (row_off, col_off).
pub fn tile_file_name(row_off: usize, col_off: usize) -> String {
    format!("{TILE_TAG}_{row_off}_{col_off}.tif")
}

/// Parse `(row_off, col_off)` back out of a tile filename, or `None` if
/// the name does not follow the tile naming scheme.
pub fn parse_tile_name(file_name: &str) -> Option<(usize, usize)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !TILE_EXTENSIONS.contains(&ext) {
        return None;
    }
    let mut parts = stem.split('_');
    let (tag, row, col) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || tag != TILE_TAG {
        return None;
    }
    let row_off = row.parse::<usize>().ok()?;
    let col_off = col.parse::<usize>().ok()?;
    Some((row_off, col_off))
}

/// Whether a filename is a valid tile name.
pub fn is_tile_name(file_name: &str) -> bool {
    parse_tile_name(file_name).is_some()
}

/// List the valid tile files in a directory, sorted by (row_off, col_off)
/// so downstream processing order is reproducible. Non-tile files are not
/// an error; they are skipped.
pub fn discover_tiles(dir: &Path) -> Result<Vec<(usize, usize, PathBuf)>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading tile directory {}", dir.display()))?;

    let mut tiles = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        match parse_tile_name(name) {
            Some((row_off, col_off)) => tiles.push((row_off, col_off, entry.path())),
            None => debug!("skipping non-tile file {name}"),
        }
    }
    tiles.sort_by_key(|&(row, col, _)| (row, col));
    Ok(tiles)
}
