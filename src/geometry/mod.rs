//! Region boundaries: the ordered [`crate::RegionSet`], GeoJSON loading and the provider cascade.

pub(crate) mod geojson;
pub(crate) mod provider;
pub(crate) mod region;
