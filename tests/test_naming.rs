use geodetect::raster::naming::{
    discover_tiles, is_tile_name, parse_tile_name, tile_file_name,
};

#[test]
fn valid_tile_names_are_accepted() {
    assert!(is_tile_name("tile_12_7.tif"));
    assert!(is_tile_name("tile_0_0.tif"));
    assert!(is_tile_name("tile_512_1024.tiff"));
}

#[test]
fn invalid_tile_names_are_rejected() {
    assert!(!is_tile_name("tile_12.tif"));
    assert!(!is_tile_name("mask_1_2.tif"));
    assert!(!is_tile_name("tile_a_b.tif"));
    assert!(!is_tile_name("tile_1_2_3.tif"));
    assert!(!is_tile_name("tile_1_2.jpg"));
    assert!(!is_tile_name("tile_1_2"));
    assert!(!is_tile_name("tile_-1_2.tif"));
}

#[test]
fn file_name_round_trips_offsets() {
    let name = tile_file_name(512, 1024);
    assert_eq!(name, "tile_512_1024.tif");
    assert_eq!(parse_tile_name(&name), Some((512, 1024)));
}

#[test]
fn discovery_skips_unrelated_files_and_sorts() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    for name in [
        "tile_512_0.tif",
        "tile_0_512.tif",
        "tile_0_0.tif",
        "notes.txt",
        "tile_0_0.jpg",
        "mask_0_0.tif",
    ] {
        std::fs::write(dir.path().join(name), b"")?;
    }

    let tiles = discover_tiles(dir.path())?;
    let offsets: Vec<(usize, usize)> = tiles.iter().map(|&(r, c, _)| (r, c)).collect();
    assert_eq!(offsets, vec![(0, 0), (0, 512), (512, 0)]);
    Ok(())
}
