use anyhow::Result;
use gdal::spatial_ref::SpatialRef;
use gdal::vector::LayerAccess;
use gdal::Dataset;
use geodetect::models::{GeoPolygon, TileFeature};
use geodetect::vector::write_shapefile;

fn square(x: f64, y: f64, side: f64) -> GeoPolygon {
    GeoPolygon {
        corners: [
            (x, y),
            (x + side, y),
            (x + side, y - side),
            (x, y - side),
        ],
    }
}

#[test]
fn features_round_trip_in_order() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("detections.shp");
    let features = vec![
        TileFeature {
            id: 0,
            geometry: square(500_000.0, 6_000_000.0, 10.0),
        },
        TileFeature {
            id: 1,
            geometry: square(500_100.0, 6_000_000.0, 10.0),
        },
        TileFeature {
            id: 2,
            geometry: square(500_200.0, 6_000_000.0, 10.0),
        },
    ];

    write_shapefile(&path, &features, &SpatialRef::from_epsg(32633)?)?;

    // Sidecars ship with the .shp; the CRS lives in the .prj.
    assert!(dir.path().join("detections.shx").exists());
    assert!(dir.path().join("detections.dbf").exists());
    assert!(dir.path().join("detections.prj").exists());

    let ds = Dataset::open(&path)?;
    let mut layer = ds.layer(0)?;
    let ids: Vec<i64> = layer
        .features()
        .map(|f| {
            f.field("id")
                .expect("id field readable")
                .expect("id field set")
                .into_int64()
                .expect("id field is an integer")
        })
        .collect();
    assert_eq!(ids, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn empty_feature_list_writes_an_empty_layer() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("detections.shp");
    write_shapefile(&path, &[], &SpatialRef::from_epsg(32633)?)?;

    let ds = Dataset::open(&path)?;
    let mut layer = ds.layer(0)?;
    assert_eq!(layer.features().count(), 0);
    Ok(())
}
