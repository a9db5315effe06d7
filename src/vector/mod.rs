//! Rectify pixel-space detections into geographic polygons and persist
//! them as an ESRI Shapefile.

use std::path::Path;

use anyhow::{Context, Result};
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{FieldValue, Geometry, LayerAccess, OGRFieldType, OGRwkbGeometryType};
use gdal::{DriverManager, LayerOptions};
use log::info;

use crate::models::{DetectionBox, GeoPolygon, GeoTransform, TileFeature};

/// Map a tile-local detection box to the geographic polygon of its four
/// corners under the tile's transform. Pure: a degenerate box yields a
/// zero-area polygon, unchanged.
pub fn rectify(bbox: &DetectionBox, transform: &GeoTransform) -> GeoPolygon {
    let (x1, y1) = (f64::from(bbox.x1), f64::from(bbox.y1));
    let (x2, y2) = (f64::from(bbox.x2), f64::from(bbox.y2));
    GeoPolygon {
        corners: [
            transform.apply(x1, y1),
            transform.apply(x2, y1),
            transform.apply(x2, y2),
            transform.apply(x1, y2),
        ],
    }
}

fn polygon_geometry(poly: &GeoPolygon) -> Result<Geometry> {
    let mut ring = Geometry::empty(OGRwkbGeometryType::wkbLinearRing)?;
    for &(x, y) in &poly.corners {
        ring.add_point_2d((x, y));
    }
    let (x0, y0) = poly.corners[0];
    ring.add_point_2d((x0, y0));
    let mut polygon = Geometry::empty(OGRwkbGeometryType::wkbPolygon)?;
    polygon.add_geometry(ring)?;
    Ok(polygon)
}

/// Write the feature collection as a Shapefile with a `Polygon` layer and
/// a single integer `id` field, tagged with the source raster's CRS.
///
/// All geometries are assembled before the dataset is created, so a
/// malformed feature never leaves a partial file behind.
pub fn write_shapefile(path: &Path, features: &[TileFeature], srs: &SpatialRef) -> Result<()> {
    let mut geometries = Vec::with_capacity(features.len());
    for feature in features {
        let geometry = polygon_geometry(&feature.geometry)
            .with_context(|| format!("feature {} has an invalid geometry", feature.id))?;
        geometries.push(geometry);
    }

    let driver = DriverManager::get_driver_by_name("ESRI Shapefile")
        .context("ESRI Shapefile driver unavailable")?;
    let mut ds = driver
        .create_vector_only(path)
        .with_context(|| format!("cannot create shapefile {}", path.display()))?;
    let mut layer = ds.create_layer(LayerOptions {
        name: "detections",
        srs: Some(srs),
        ty: OGRwkbGeometryType::wkbPolygon,
        ..Default::default()
    })?;
    layer.create_defn_fields(&[("id", OGRFieldType::OFTInteger64)])?;

    for (feature, geometry) in features.iter().zip(geometries) {
        layer.create_feature_fields(
            geometry,
            &["id"],
            &[FieldValue::Integer64Value(feature.id)],
        )?;
    }

    info!(
        "wrote {} detection features to {}",
        features.len(),
        path.display()
    );
    Ok(())
}
