use super::*;
use crate::ingest::sample::{DEFAULT_YEAR, YEAR_MAX, YEAR_MIN};
use crate::ingest::table::read_table;

fn store_from_csv(csv: &str) -> SampleStore {
    SampleStore::from_table(&read_table(csv).unwrap())
}

#[test]
fn every_channel_lands_in_unit_range() {
    let store = store_from_csv(
        "year,latitude,longitude,red_pct,green_pct,blue_pct\n\
         1900,1,1,0.2,-0.5,1.0\n\
         1900,1,1,0.9,0.1,inf\n\
         1901,1,1,,0.3,0.4\n",
    );
    assert_eq!(store.len(), 3);
    for s in store.iter() {
        assert!(s.color.is_valid(), "{s:?}");
    }
}

#[test]
fn column_over_one_is_rescaled_from_255_then_clamped() {
    let store = store_from_csv(
        "year,latitude,longitude,red_pct,green_pct,blue_pct\n\
         1900,0,0,300,0.5,0.5\n\
         1900,0,0,51,0.5,0.5\n",
    );
    let samples = store.for_year(1900);
    // 300 / 255 clamps to 1.0; the rest of the column shares the scale.
    assert_eq!(samples[0].color.red, 1.0);
    assert!((samples[1].color.red - 0.2).abs() < 1e-12);
    // Untouched columns stay as-is.
    assert_eq!(samples[0].color.green, 0.5);
}

#[test]
fn missing_columns_are_synthesized_with_defaults() {
    let store = store_from_csv("red_pct\n0.5\n0.25\n");
    assert_eq!(store.years().collect::<Vec<_>>(), vec![DEFAULT_YEAR]);
    for s in store.iter() {
        assert_eq!(s.location, GeoPoint::unknown());
        assert_eq!(s.color.green, 0.33);
        assert_eq!(s.color.blue, 0.33);
    }
}

#[test]
fn years_are_truncated_clamped_and_sorted() {
    let store = store_from_csv(
        "year,red_pct\n\
         1950.7,0.1\n\
         -40,0.1\n\
         99999,0.1\n\
         1900,0.1\n\
         1950,0.1\n",
    );
    assert_eq!(
        store.years().collect::<Vec<_>>(),
        vec![YEAR_MIN, 1900, 1950, YEAR_MAX]
    );
    assert_eq!(store.for_year(1950).len(), 2);
    assert!(store.for_year(1800).is_empty());
}

#[test]
fn empty_table_gives_empty_store() {
    let store = store_from_csv("year,latitude,longitude,red_pct,green_pct,blue_pct\n");
    assert!(store.is_empty());
    assert_eq!(store.years().len(), 0);
}

#[test]
fn samples_of_one_year_keep_input_order() {
    let store = store_from_csv("year,latitude\n1900,1\n1901,9\n1900,2\n1900,3\n");
    let lats: Vec<f64> = store.for_year(1900).iter().map(|s| s.location.lat).collect();
    assert_eq!(lats, vec![1.0, 2.0, 3.0]);
}
