use std::collections::BTreeMap;

use crate::foundation::core::{ColorFraction, GeoPoint};
use crate::ingest::sample::{DEFAULT_FRACTION, Sample, year_from_raw};
use crate::ingest::table::{
    COL_BLUE, COL_GREEN, COL_LATITUDE, COL_LONGITUDE, COL_RED, COL_YEAR, RawTable,
};

/// Sanitized, year-indexed sample collection.
///
/// Read-only once built. Samples of one year keep their input order, which matters because
/// nearest-neighbour selection uses a stable sort.
#[derive(Clone, Debug, Default)]
pub struct SampleStore {
    by_year: BTreeMap<i32, Vec<Sample>>,
    len: usize,
}

impl SampleStore {
    /// Build a store from samples (already sanitized by [`Sample::new`]).
    pub fn from_samples(samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut store = Self::default();
        for s in samples {
            store.by_year.entry(s.year).or_default().push(s);
            store.len += 1;
        }
        store
    }

    /// Sanitize a raw table into samples.
    ///
    /// - missing columns are synthesized (`year = 2000`, coordinates `0.0`, fractions `0.33`)
    /// - missing cells get the same defaults
    /// - a color column whose maximum exceeds `1.0` is treated as `[0, 255]` and divided by 255
    /// - every channel is then clamped into `[0, 1]`
    pub fn from_table(table: &RawTable) -> Self {
        let rows = table.len();

        let years: Vec<i32> = match table.column(COL_YEAR) {
            Some(col) => col.iter().copied().map(year_from_raw).collect(),
            None => {
                tracing::warn!(column = COL_YEAR, "column not found, using default values");
                vec![year_from_raw(None); rows]
            }
        };
        let lat = coordinate_column(table, COL_LATITUDE);
        let lon = coordinate_column(table, COL_LONGITUDE);
        let red = fraction_column(table, COL_RED);
        let green = fraction_column(table, COL_GREEN);
        let blue = fraction_column(table, COL_BLUE);

        Self::from_samples((0..rows).map(|i| {
            Sample::new(
                years[i],
                GeoPoint::new(lat[i], lon[i]),
                ColorFraction::new(red[i], green[i], blue[i]),
            )
        }))
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` when the store holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct years in ascending order.
    pub fn years(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Samples tagged with exactly `year`, in input order.
    pub fn for_year(&self, year: i32) -> &[Sample] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All samples, ordered by year then input order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.by_year.values().flatten()
    }
}

fn coordinate_column(table: &RawTable, name: &str) -> Vec<f64> {
    match table.column(name) {
        Some(col) => col
            .iter()
            .map(|v| v.filter(|v| v.is_finite()).unwrap_or(0.0))
            .collect(),
        None => {
            tracing::warn!(column = name, "column not found, using default values");
            vec![0.0; table.len()]
        }
    }
}

fn fraction_column(table: &RawTable, name: &str) -> Vec<f64> {
    let Some(col) = table.column(name) else {
        tracing::warn!(column = name, "column not found, using default values");
        return vec![DEFAULT_FRACTION; table.len()];
    };

    let mut values: Vec<f64> = col
        .iter()
        .map(|v| v.filter(|v| !v.is_nan()).unwrap_or(DEFAULT_FRACTION))
        .collect();

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 1.0 {
        tracing::info!(column = name, "normalizing values from 0-255 to 0-1 range");
        for v in &mut values {
            *v /= 255.0;
        }
    }
    for v in &mut values {
        *v = v.clamp(0.0, 1.0);
    }
    values
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/store.rs"]
mod tests;
