use crate::foundation::core::GeoPoint;
use crate::ingest::sample::Sample;

/// Offset added to every distance so a sample sitting on the anchor gets a finite weight.
pub const EPSILON: f64 = 0.001;

/// Euclidean distance on the raw `(lat, lon)` plane, in degrees.
pub fn planar_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    (a.lat - b.lat).hypot(a.lon - b.lon)
}

/// Inverse-distance weight: `1 / (distance + EPSILON)`.
pub fn weight(distance: f64) -> f64 {
    1.0 / (distance + EPSILON)
}

/// One weight per candidate, in candidate order. Empty in, empty out.
pub fn inverse_distance_weights(anchor: GeoPoint, candidates: &[Sample]) -> Vec<f64> {
    candidates
        .iter()
        .map(|s| weight(planar_distance(anchor, s.location)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/interp/weight.rs"]
mod tests;
