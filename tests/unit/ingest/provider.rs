use super::*;

#[test]
fn demo_data_is_reproducible_and_sane() {
    let a = demo_samples(7);
    let b = demo_samples(7);
    assert_eq!(a.len(), 21 * 5);
    assert_eq!(a.years().next(), Some(1900));
    assert_eq!(a.years().last(), Some(2000));
    assert!(a.iter().zip(b.iter()).all(|(x, y)| x == y));
    assert!(a.iter().all(|s| s.color.is_valid()));

    let c = demo_samples(8);
    assert!(a.iter().zip(c.iter()).any(|(x, y)| x.color != y.color));
}

#[test]
fn missing_csv_falls_through_to_demo() {
    let providers = [
        SampleProvider::CsvFile(PathBuf::from("target/does-not-exist/samples.csv")),
        SampleProvider::Demo { seed: 1 },
    ];
    let (store, used) = load_samples(&providers).unwrap();
    assert_eq!(used, SampleProvider::Demo { seed: 1 });
    assert!(!store.is_empty());
}

#[test]
fn csv_provider_wins_when_readable() {
    let dir = PathBuf::from("target").join("unit_ingest_provider");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("samples.csv");
    std::fs::write(
        &path,
        "year,latitude,longitude,red_pct,green_pct,blue_pct\n1920,45,9,0.6,0.2,0.2\n",
    )
    .unwrap();

    let providers = [
        SampleProvider::CsvFile(path.clone()),
        SampleProvider::Demo { seed: 1 },
    ];
    let (store, used) = load_samples(&providers).unwrap();
    assert_eq!(used, SampleProvider::CsvFile(path));
    assert_eq!(store.len(), 1);
    assert_eq!(store.for_year(1920)[0].location, GeoPoint::new(45.0, 9.0));
}

#[test]
fn no_provider_is_an_ingest_error() {
    let err = load_samples(&[]).unwrap_err();
    assert!(err.to_string().contains("ingest error"));
}
