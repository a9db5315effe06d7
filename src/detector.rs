use std::path::Path;

use anyhow::Result;

use crate::models::DetectionBox;

/// External object-detector collaborator: consumes one tile rendered as a
/// standard 3-band image file, returns pixel-space boxes already filtered
/// by the caller-supplied confidence threshold.
pub trait BoxDetector {
    fn detect(&self, image: &Path, confidence: f32) -> Result<Vec<DetectionBox>>;
}

/// Detector stub that never reports a box. Lets the binary and tests
/// exercise the slicing/merging geometry without a real model.
pub struct NoDetections;

impl BoxDetector for NoDetections {
    fn detect(&self, _image: &Path, _confidence: f32) -> Result<Vec<DetectionBox>> {
        Ok(Vec::new())
    }
}
