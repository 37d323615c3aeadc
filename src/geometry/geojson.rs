use geo::{LineString, MultiPolygon, Polygon};
use serde::Deserialize;

use crate::foundation::error::{AtlasError, AtlasResult};
use crate::geometry::region::Region;

/// Feature properties checked, in order, for the region name.
const NAME_KEYS: [&str; 3] = ["NAME", "name", "ADMIN"];

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Unsupported,
}

/// Parse a GeoJSON `FeatureCollection` into regions, keeping features whose name passes `keep`.
///
/// The name is the first of the `NAME`, `name` and `ADMIN` properties accepted by `keep`.
/// Features without such a name, or with geometry other than `Polygon`/`MultiPolygon`, are skipped.
/// Output order follows the feature order in the document.
pub fn parse_regions(json: &str, keep: impl Fn(&str) -> bool) -> AtlasResult<Vec<Region>> {
    let fc: FeatureCollection = serde_json::from_str(json)
        .map_err(|e| AtlasError::serde(format!("invalid GeoJSON feature collection: {e}")))?;

    let mut out = Vec::new();
    for feature in fc.features {
        let Some(name) = feature_names(feature.properties.as_ref()).find(|n| keep(n)) else {
            continue;
        };
        let boundary = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => {
                MultiPolygon::new(vec![polygon_from_rings(&name, &coordinates)?])
            }
            Some(Geometry::MultiPolygon { coordinates }) => MultiPolygon::new(
                coordinates
                    .iter()
                    .map(|rings| polygon_from_rings(&name, rings))
                    .collect::<AtlasResult<Vec<_>>>()?,
            ),
            Some(Geometry::Unsupported) | None => {
                tracing::debug!(%name, "skipping feature without polygon geometry");
                continue;
            }
        };
        out.push(Region::new(name, boundary));
    }
    Ok(out)
}

fn feature_names(
    props: Option<&serde_json::Map<String, serde_json::Value>>,
) -> impl Iterator<Item = &str> {
    NAME_KEYS
        .iter()
        .filter_map(move |k| props?.get(*k)?.as_str())
}

fn polygon_from_rings(name: &str, rings: &[Vec<Vec<f64>>]) -> AtlasResult<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| line_string(name, ring));
    let exterior = rings
        .next()
        .ok_or_else(|| AtlasError::geometry(format!("polygon of '{name}' has no rings")))??;
    let interiors = rings.collect::<AtlasResult<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn line_string(name: &str, ring: &[Vec<f64>]) -> AtlasResult<LineString<f64>> {
    ring.iter()
        .map(|pos| match pos.as_slice() {
            [x, y, ..] => Ok((*x, *y)),
            _ => Err(AtlasError::geometry(format!(
                "position in '{name}' needs at least two coordinates"
            ))),
        })
        .collect::<AtlasResult<Vec<_>>>()
        .map(LineString::from)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/geojson.rs"]
mod tests;
