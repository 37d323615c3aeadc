use super::*;
use crate::geometry::region::SYNTHETIC_REGION_NAME;

fn scratch_dir() -> PathBuf {
    let dir = PathBuf::from("target").join("unit_geometry_provider");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn missing_files_fall_back_to_synthetic() {
    let providers = region_cascade(&[PathBuf::from("target/nope/a.geojson")]);
    let (set, used) = load_regions(&providers);
    assert_eq!(used, RegionProvider::Synthetic);
    assert_eq!(set.len(), 1);
    assert!(set.get(SYNTHETIC_REGION_NAME).is_some());
}

#[test]
fn empty_provider_list_still_yields_regions() {
    let (set, used) = load_regions(&[]);
    assert_eq!(used, RegionProvider::Synthetic);
    assert!(!set.is_empty());
}

#[test]
fn file_without_european_countries_is_skipped() {
    let dir = scratch_dir();
    let other = dir.join("other.geojson");
    std::fs::write(
        &other,
        r#"{"features": [{"properties": {"NAME": "Chile"},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}]}"#,
    )
    .unwrap();
    let good = dir.join("good.geojson");
    std::fs::write(
        &good,
        r#"{"features": [{"properties": {"NAME": "Spain"},
            "geometry": {"type": "Polygon", "coordinates": [[[-8,36],[3,36],[3,43],[-8,43],[-8,36]]]}}]}"#,
    )
    .unwrap();

    let (set, used) = load_regions(&region_cascade(&[other, good.clone()]));
    assert_eq!(used, RegionProvider::GeoJsonFile(good));
    assert_eq!(set.len(), 1);
    assert!(set.get("Spain").is_some());
}
