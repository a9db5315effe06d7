//! End-to-end orchestration: slice, detect, annotate, merge, write vector.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::detector::BoxDetector;
use crate::models::TileFeature;
use crate::raster::naming::{discover_tiles, tile_file_name};
use crate::raster::{annotate, merge, open_raster, read_geo_transform, windower};
use crate::vector;

/// Pipeline parameters and staging layout. Staging directories are
/// created idempotently at the start of each run and not torn down.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tile size in pixels, (height, width).
    pub tile_size: (usize, usize),
    /// Confidence threshold handed to the detector.
    pub confidence: f32,
    /// Directory for the raw tiles cut from the source.
    pub sliced_dir: PathBuf,
    /// Directory for annotated tiles and detector temp images.
    pub detected_dir: PathBuf,
}

impl PipelineConfig {
    pub fn new(staging_root: &Path) -> Self {
        Self {
            tile_size: (512, 512),
            confidence: 0.3,
            sliced_dir: staging_root.join("sliced_tiles"),
            detected_dir: staging_root.join("detected_tiles"),
        }
    }

    pub fn with_tile_size(mut self, height: usize, width: usize) -> Self {
        self.tile_size = (height, width);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub tiles: usize,
    pub features: usize,
}

/// Run the whole pipeline: slice the source raster, detect and annotate
/// every tile, merge the annotated tiles into `output_raster`, and write
/// the rectified detections to `output_vector` in the source CRS.
///
/// Feature ids are assigned monotonically in tile order (sorted by row
/// then column offset), so a rerun over the same input reproduces the
/// same ids.
pub fn run(
    input: &Path,
    config: &PipelineConfig,
    detector: &dyn BoxDetector,
    output_raster: &Path,
    output_vector: &Path,
) -> Result<RunSummary> {
    std::fs::create_dir_all(&config.sliced_dir)?;
    std::fs::create_dir_all(&config.detected_dir)?;

    let (tile_height, tile_width) = config.tile_size;
    windower::slice_into_tiles(input, &config.sliced_dir, tile_height, tile_width)
        .context("slicing stage failed")?;

    let tiles = discover_tiles(&config.sliced_dir).context("slicing stage failed")?;
    let mut features: Vec<TileFeature> = Vec::new();
    let mut next_id: i64 = 0;

    for &(row_off, col_off, ref tile_path) in &tiles {
        debug!("processing tile ({row_off}, {col_off})");

        let mut rgb = annotate::render_rgb(tile_path).context("annotation stage failed")?;

        // The detector consumes a plain 3-band image file.
        let stem = tile_path
            .file_stem()
            .and_then(|s| s.to_str())
            .context("tile path has no file stem")?;
        let temp_image = config.detected_dir.join(format!("{stem}.jpg"));
        rgb.save(&temp_image)
            .with_context(|| format!("writing detector input {}", temp_image.display()))?;

        let boxes = detector
            .detect(&temp_image, config.confidence)
            .context("detection stage failed")?;
        debug!("tile ({row_off}, {col_off}): {} detections", boxes.len());

        annotate::draw_boxes(&mut rgb, &boxes);
        let annotated_path = config.detected_dir.join(tile_file_name(row_off, col_off));
        annotate::write_annotated_tile(tile_path, &annotated_path, &rgb)
            .context("annotation stage failed")?;

        std::fs::remove_file(&temp_image)
            .with_context(|| format!("removing detector input {}", temp_image.display()))?;

        if !boxes.is_empty() {
            let tile_ds = open_raster(tile_path)?;
            let transform = read_geo_transform(&tile_ds, tile_path)?;
            for bbox in &boxes {
                features.push(TileFeature {
                    id: next_id,
                    geometry: vector::rectify(bbox, &transform),
                });
                next_id += 1;
            }
        }
    }

    merge::merge_tiles(&config.detected_dir, output_raster).context("merge stage failed")?;

    let srs = {
        let src = open_raster(input)?;
        src.spatial_ref()
            .context("source raster has no coordinate reference system")?
    };
    vector::write_shapefile(output_vector, &features, &srs).context("vector write stage failed")?;

    info!(
        "pipeline complete: {} tiles, {} features",
        tiles.len(),
        features.len()
    );
    Ok(RunSummary {
        tiles: tiles.len(),
        features: features.len(),
    })
}
