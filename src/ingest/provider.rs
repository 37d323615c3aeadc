use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{ColorFraction, GeoPoint};
use crate::foundation::error::{AtlasError, AtlasResult};
use crate::foundation::math::Fnv1a64;
use crate::ingest::sample::Sample;
use crate::ingest::store::SampleStore;
use crate::ingest::table::{decode_text, read_table};

/// One way of obtaining samples. Providers are tried in order; the first success wins.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleProvider {
    /// Read a CSV file from disk.
    CsvFile(PathBuf),
    /// Generate the built-in demonstration data set.
    Demo {
        /// Seed for the pseudo-random channel values.
        seed: u64,
    },
}

/// Load a sample store from a CSV file (encoding detected via [`decode_text`]).
pub fn load_samples_csv(path: &Path) -> AtlasResult<SampleStore> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read samples from '{}'", path.display()))?;
    let (text, encoding) = decode_text(&bytes)?;
    tracing::debug!(path = %path.display(), ?encoding, "decoded sample file");
    let table = read_table(&text)?;
    Ok(SampleStore::from_table(&table))
}

/// Try each provider in order and return the first store that loads, with the provider used.
pub fn load_samples(providers: &[SampleProvider]) -> AtlasResult<(SampleStore, SampleProvider)> {
    for provider in providers {
        let attempt = match provider {
            SampleProvider::CsvFile(path) => load_samples_csv(path),
            SampleProvider::Demo { seed } => Ok(demo_samples(*seed)),
        };
        match attempt {
            Ok(store) => {
                tracing::info!(?provider, samples = store.len(), "loaded samples");
                return Ok((store, provider.clone()));
            }
            Err(e) => tracing::warn!(?provider, error = %e, "sample provider failed"),
        }
    }
    Err(AtlasError::ingest("no sample provider succeeded"))
}

const DEMO_CITIES: [(&str, f64, f64); 5] = [
    ("Paris", 48.8566, 2.3522),
    ("Berlin", 52.5200, 13.4050),
    ("Rome", 41.9028, 12.4964),
    ("London", 51.5074, -0.1278),
    ("Madrid", 40.4168, -3.7038),
];

/// Demonstration data: five capitals, every fifth year from 1900 to 2000.
///
/// Channel values are pseudo-random but fully determined by `seed`.
pub fn demo_samples(seed: u64) -> SampleStore {
    let samples = (1900..=2000).step_by(5).flat_map(|year| {
        DEMO_CITIES
            .iter()
            .enumerate()
            .map(move |(city, &(_, lat, lon))| {
                let channel = |c: u8| {
                    let mut h = Fnv1a64::new(seed ^ Fnv1a64::OFFSET_BASIS);
                    h.write_i64(i64::from(year));
                    h.write_u64(city as u64);
                    h.write_u8(c);
                    h.finish_unit()
                };
                Sample::new(
                    year,
                    GeoPoint::new(lat, lon),
                    ColorFraction::new(channel(0), channel(1), channel(2)),
                )
            })
    });
    SampleStore::from_samples(samples)
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/provider.rs"]
mod tests;
