pub mod detector;
pub mod models;
pub mod pipeline;
pub mod raster;
pub mod vector;

pub use detector::{BoxDetector, NoDetections};
pub use models::{DetectionBox, GeoPolygon, GeoTransform, TileFeature, TileWindow};
pub use pipeline::{PipelineConfig, RunSummary};
