use geo::{BoundingRect, Centroid, LineString, MultiPolygon, Polygon};

use crate::foundation::core::GeoPoint;

/// Country names accepted from boundary sources.
pub const EUROPEAN_COUNTRIES: [&str; 43] = [
    "Albania",
    "Andorra",
    "Austria",
    "Belarus",
    "Belgium",
    "Bosnia and Herzegovina",
    "Bulgaria",
    "Croatia",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Iceland",
    "Ireland",
    "Italy",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Moldova",
    "Monaco",
    "Montenegro",
    "Netherlands",
    "North Macedonia",
    "Norway",
    "Poland",
    "Portugal",
    "Romania",
    "Russia",
    "San Marino",
    "Serbia",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
    "Switzerland",
    "Ukraine",
    "United Kingdom",
    "Vatican City",
];

/// Return `true` when `name` is on the European allow-list.
pub fn is_european(name: &str) -> bool {
    EUROPEAN_COUNTRIES.contains(&name)
}

/// Name of the single synthetic region used when no boundary data is available.
pub const SYNTHETIC_REGION_NAME: &str = "Europe";

/// A named polygon that receives one color per year.
///
/// Geometry is stored as `(x = longitude, y = latitude)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    name: String,
    boundary: MultiPolygon<f64>,
    anchor: GeoPoint,
}

impl Region {
    /// Create a region; the anchor is the area centroid of `boundary`.
    pub fn new(name: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        let anchor = anchor_of(&boundary);
        Self {
            name: name.into(),
            boundary,
            anchor,
        }
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boundary geometry in `(lon, lat)` coordinates.
    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    /// Representative point used for distance computations.
    pub fn anchor(&self) -> GeoPoint {
        self.anchor
    }
}

fn anchor_of(boundary: &MultiPolygon<f64>) -> GeoPoint {
    if let Some(c) = boundary.centroid()
        && c.x().is_finite()
        && c.y().is_finite()
    {
        return GeoPoint::new(c.y(), c.x());
    }
    // Zero-area rings have no area centroid.
    if let Some(rect) = boundary.bounding_rect() {
        let c = rect.center();
        return GeoPoint::new(c.y, c.x);
    }
    GeoPoint::unknown()
}

/// Build a one-polygon boundary from a closed or open `(lon, lat)` ring.
pub fn ring_boundary(ring: &[(f64, f64)]) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![Polygon::new(LineString::from(ring.to_vec()), vec![])])
}

/// Ordered, immutable set of regions.
///
/// Enumeration order is the load order and is never re-sorted; frames list regions in this order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// Wrap regions in their enumeration order.
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// The fallback "Europe" rectangle spanning latitude 35..75 and longitude -10..40.
    pub fn synthetic_europe() -> Self {
        let ring = [
            (-10.0, 35.0),
            (40.0, 35.0),
            (40.0, 75.0),
            (-10.0, 75.0),
            (-10.0, 35.0),
        ];
        Self::new(vec![Region::new(SYNTHETIC_REGION_NAME, ring_boundary(&ring))])
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Return `true` when the set holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterate regions in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Borrow regions as a slice.
    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a region by name.
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/region.rs"]
mod tests;
