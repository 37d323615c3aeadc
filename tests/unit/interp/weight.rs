use super::*;
use crate::foundation::core::ColorFraction;

fn at(lat: f64, lon: f64) -> Sample {
    Sample::new(2000, GeoPoint::new(lat, lon), ColorFraction::new(0.5, 0.5, 0.5))
}

#[test]
fn coincident_sample_gets_finite_large_weight() {
    let w = weight(planar_distance(GeoPoint::new(1.0, 2.0), GeoPoint::new(1.0, 2.0)));
    assert_eq!(w, 1.0 / EPSILON);
}

#[test]
fn distance_is_planar_on_lat_lon() {
    let d = planar_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(3.0, 4.0));
    assert_eq!(d, 5.0);
}

#[test]
fn weights_follow_candidate_order_and_decrease_with_distance() {
    let anchor = GeoPoint::new(50.0, 10.0);
    let w = inverse_distance_weights(anchor, &[at(51.0, 10.0), at(52.0, 10.0)]);
    assert_eq!(w, vec![1.0 / (1.0 + EPSILON), 1.0 / (2.0 + EPSILON)]);
    assert!((w[0] - 0.999).abs() < 1e-3);
    assert!((w[1] - 0.4998).abs() < 1e-4);
    assert!(w[0] > w[1]);
}

#[test]
fn empty_candidates_yield_no_weights() {
    assert!(inverse_distance_weights(GeoPoint::unknown(), &[]).is_empty());
}
