use rayon::prelude::*;
use serde::ser::SerializeMap as _;

use crate::foundation::core::HexColor;
use crate::foundation::math::mean;
use crate::geometry::region::{Region, RegionSet};
use crate::ingest::sample::Sample;
use crate::ingest::store::SampleStore;
use crate::interp::resolve::resolve_at;

/// RGB channel with the highest mean fraction in a year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DominantChannel {
    /// Red channel.
    Red,
    /// Green channel.
    Green,
    /// Blue channel.
    Blue,
}

impl DominantChannel {
    /// Tie-break order: earlier wins when means are exactly equal.
    pub const ORDER: [DominantChannel; 3] = [
        DominantChannel::Red,
        DominantChannel::Green,
        DominantChannel::Blue,
    ];

    /// Display label (`Red`, `Green`, `Blue`).
    pub fn label(self) -> &'static str {
        match self {
            DominantChannel::Red => "Red",
            DominantChannel::Green => "Green",
            DominantChannel::Blue => "Blue",
        }
    }
}

impl std::fmt::Display for DominantChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dominant channel across all samples of one year (unweighted means).
///
/// `None` when `samples` is empty or any mean is NaN.
pub fn dominant_channel(samples: &[Sample]) -> Option<DominantChannel> {
    if samples.is_empty() {
        return None;
    }
    let means = [
        mean(samples.iter().map(|s| s.color.red)),
        mean(samples.iter().map(|s| s.color.green)),
        mean(samples.iter().map(|s| s.color.blue)),
    ];
    if means.iter().any(|m| m.is_nan()) {
        return None;
    }

    // Strict `>` keeps the earlier channel on exact ties.
    let best = (1..means.len()).fold(0, |best, i| if means[i] > means[best] { i } else { best });
    Some(DominantChannel::ORDER[best])
}

/// Resolved color slot for one region within a [`Frame`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionColor {
    /// Region name, as in the region set.
    pub name: String,
    /// Resolved `#RRGGBB` color (sentinel when no data).
    pub color: HexColor,
    /// Whether the color was computed from samples.
    pub had_data: bool,
}

/// Every region's color for one year, plus the year's dominant channel.
///
/// Regions appear in region-set order and every region has a color.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Frame {
    /// Calendar year.
    pub year: i32,
    /// Dominant channel; `None` when the year has no usable samples.
    pub dominant_channel: Option<DominantChannel>,
    /// One slot per region, in region-set order.
    #[serde(serialize_with = "serialize_region_colors")]
    pub regions: Vec<RegionColor>,
}

impl Frame {
    /// Color assigned to `name`, if the region exists.
    pub fn color_of(&self, name: &str) -> Option<HexColor> {
        self.regions
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.color)
    }

    /// Number of regions whose color was computed from samples.
    pub fn regions_with_data(&self) -> usize {
        self.regions.iter().filter(|r| r.had_data).count()
    }
}

fn serialize_region_colors<S>(regions: &[RegionColor], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut map = serializer.serialize_map(Some(regions.len()))?;
    for r in regions {
        map.serialize_entry(&r.name, &r.color)?;
    }
    map.end()
}

/// Builds the [`Frame`] of one year.
#[derive(Clone, Copy, Debug, Default)]
pub struct YearFrameBuilder {
    /// Resolve regions concurrently on the current rayon pool.
    pub parallel: bool,
}

impl YearFrameBuilder {
    /// Sequential builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that resolves regions on the rayon pool.
    pub fn parallel() -> Self {
        Self { parallel: true }
    }

    /// Resolve every region for `year`. Always returns a fully populated frame.
    #[tracing::instrument(skip(self, regions, samples), fields(regions = regions.len()))]
    pub fn build(&self, year: i32, regions: &RegionSet, samples: &SampleStore) -> Frame {
        let year_samples = samples.for_year(year);
        if year_samples.is_empty() {
            tracing::info!(year, "no data found for year, using default colors");
        }

        let resolve_one = |region: &Region| {
            let res = resolve_at(region.anchor(), year, year_samples);
            RegionColor {
                name: region.name().to_owned(),
                color: res.color,
                had_data: res.had_data,
            }
        };

        // Indexed collect keeps region-set order on both paths.
        let slots: Vec<RegionColor> = if self.parallel {
            regions.as_slice().par_iter().map(resolve_one).collect()
        } else {
            regions.iter().map(resolve_one).collect()
        };

        let dominant = if slots.iter().any(|s| s.had_data) {
            dominant_channel(year_samples)
        } else {
            None
        };
        Frame {
            year,
            dominant_channel: dominant,
            regions: slots,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interp/frame.rs"]
mod tests;
