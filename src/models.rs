/// 6-parameter affine transform mapping pixel coordinates to geographic
/// coordinates, in GDAL's geotransform layout:
/// `[origin_x, px_w, rot_x, origin_y, rot_y, px_h]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    pub fn new(gt: [f64; 6]) -> Self {
        Self(gt)
    }

    pub fn as_array(&self) -> &[f64; 6] {
        &self.0
    }

    /// Map a pixel coordinate (col, row) to a geographic (x, y).
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let gt = &self.0;
        let x = gt[0] + col * gt[1] + row * gt[2];
        let y = gt[3] + col * gt[4] + row * gt[5];
        (x, y)
    }

    /// Derived transform for a window at pixel offset (col_off, row_off):
    /// same scale/rotation, origin moved to the window's top-left corner.
    pub fn windowed(&self, col_off: usize, row_off: usize) -> GeoTransform {
        let (x0, y0) = self.apply(col_off as f64, row_off as f64);
        let gt = &self.0;
        GeoTransform([x0, gt[1], gt[2], y0, gt[4], gt[5]])
    }

    /// Pixel size along x and y (signed; y is negative for north-up rasters).
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.0[1], self.0[5])
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.0[0], self.0[3])
    }

    /// True when the rotation/skew terms are zero.
    pub fn is_axis_aligned(&self) -> bool {
        self.0[2] == 0.0 && self.0[4] == 0.0
    }
}

/// A rectangular window into a raster's pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub row_off: usize,
    pub col_off: usize,
    pub width: usize,
    pub height: usize,
}

/// Axis-aligned detection rectangle in tile-local pixel coordinates.
/// The detector contract guarantees `x1 < x2`, `y1 < y2`, both corners
/// within the tile bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl DetectionBox {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }
}

/// Rectangle corners in geographic coordinates, ordered top-left,
/// top-right, bottom-right, bottom-left. The ring is closed implicitly
/// (the first vertex is repeated on write).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPolygon {
    pub corners: [(f64, f64); 4],
}

/// One rectified detection: a polygon plus its globally unique id.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature {
    pub id: i64,
    pub geometry: GeoPolygon,
}
