use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{AtlasError, AtlasResult};
use crate::geometry::geojson::parse_regions;
use crate::geometry::region::{RegionSet, is_european};

/// One way of obtaining region boundaries.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionProvider {
    /// Read a GeoJSON feature collection and keep the European allow-list.
    GeoJsonFile(PathBuf),
    /// The single synthetic "Europe" rectangle. Never fails.
    Synthetic,
}

/// Natural Earth boundary locations probed by default.
pub fn default_region_sources() -> Vec<PathBuf> {
    vec![
        PathBuf::from("ne_50m_admin_0_countries.geojson"),
        PathBuf::from("ne_50m_admin_0_countries").join("ne_50m_admin_0_countries.geojson"),
        PathBuf::from("..").join("ne_50m_admin_0_countries.geojson"),
    ]
}

/// Load European regions from one GeoJSON file.
pub fn load_regions_geojson(path: &Path) -> AtlasResult<RegionSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read boundaries from '{}'", path.display()))?;
    let regions = parse_regions(&text, is_european)?;
    if regions.is_empty() {
        return Err(AtlasError::geometry(format!(
            "'{}' contains no European country polygons",
            path.display()
        )));
    }
    Ok(RegionSet::new(regions))
}

/// Try each provider in order; the first that yields regions wins.
///
/// If every provider fails (or the list does not end in [`RegionProvider::Synthetic`]), the
/// synthetic region set is returned so rendering can always proceed.
pub fn load_regions(providers: &[RegionProvider]) -> (RegionSet, RegionProvider) {
    for provider in providers {
        let attempt = match provider {
            RegionProvider::GeoJsonFile(path) => load_regions_geojson(path),
            RegionProvider::Synthetic => Ok(RegionSet::synthetic_europe()),
        };
        match attempt {
            Ok(set) => {
                tracing::info!(?provider, regions = set.len(), "loaded regions");
                return (set, provider.clone());
            }
            Err(e) => tracing::warn!(?provider, error = %e, "region boundaries unavailable"),
        }
    }
    tracing::warn!("falling back to simplified Europe map");
    (RegionSet::synthetic_europe(), RegionProvider::Synthetic)
}

/// Providers for the given GeoJSON paths, followed by the synthetic fallback.
pub fn region_cascade(paths: &[PathBuf]) -> Vec<RegionProvider> {
    paths
        .iter()
        .cloned()
        .map(RegionProvider::GeoJsonFile)
        .chain(std::iter::once(RegionProvider::Synthetic))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/provider.rs"]
mod tests;
