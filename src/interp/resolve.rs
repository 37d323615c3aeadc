use crate::foundation::core::{ColorFraction, GeoPoint, HexColor};
use crate::geometry::region::Region;
use crate::ingest::sample::Sample;
use crate::ingest::store::SampleStore;
use crate::interp::weight::{planar_distance, weight};

/// Maximum number of nearest samples that influence one region.
pub const K_NEAREST: usize = 5;

/// Channel value used when the total weight degenerates to zero.
const DEGENERATE_CHANNEL: f64 = 0.5;

/// Why a region could not be given a computed color.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ResolutionFailure {
    /// No sample is tagged with the requested year.
    #[error("no samples for year {year}")]
    NoSamples {
        /// Requested year.
        year: i32,
    },

    /// The weighted average produced a NaN or out-of-range channel.
    #[error("invalid color values: R={red}, G={green}, B={blue}")]
    InvalidNumeric {
        /// Red channel after clamping.
        red: f64,
        /// Green channel after clamping.
        green: f64,
        /// Blue channel after clamping.
        blue: f64,
    },
}

/// The color chosen for one region in one year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// `#RRGGBB`, or [`HexColor::SENTINEL`] when no valid color exists.
    pub color: HexColor,
    /// `true` only when `color` was computed from samples.
    pub had_data: bool,
}

impl Resolution {
    /// The no-data outcome.
    pub const NO_DATA: Resolution = Resolution {
        color: HexColor::SENTINEL,
        had_data: false,
    };
}

/// Resolve the color of `region` for `year`. Never fails; failures map to the sentinel.
pub fn resolve(region: &Region, year: i32, samples: &SampleStore) -> Resolution {
    resolve_at(region.anchor(), year, samples.for_year(year))
}

/// Resolve the color at `anchor` from samples already known to belong to `year`.
pub fn resolve_at(anchor: GeoPoint, year: i32, year_samples: &[Sample]) -> Resolution {
    match try_resolve_at(anchor, year, year_samples) {
        Ok(color) => Resolution {
            color: color.to_hex(),
            had_data: true,
        },
        Err(failure) => {
            tracing::debug!(%failure, "using no-data color");
            Resolution::NO_DATA
        }
    }
}

/// Weighted k-nearest average at `anchor`, or the reason none could be produced.
///
/// Samples with a year other than `year` are ignored.
pub fn try_resolve_at(
    anchor: GeoPoint,
    year: i32,
    samples: &[Sample],
) -> Result<ColorFraction, ResolutionFailure> {
    let mut nearest: Vec<(f64, &Sample)> = samples
        .iter()
        .filter(|s| s.year == year)
        .map(|s| (planar_distance(anchor, s.location), s))
        .collect();
    if nearest.is_empty() {
        return Err(ResolutionFailure::NoSamples { year });
    }

    // Stable: equidistant samples keep input order, so the cut at K is deterministic.
    nearest.sort_by(|a, b| a.0.total_cmp(&b.0));
    nearest.truncate(K_NEAREST);

    let mut sums = [0.0f64; 3];
    let mut total_weight = 0.0;
    for (distance, sample) in &nearest {
        let w = weight(*distance);
        for (sum, c) in sums.iter_mut().zip(sample.color.channels()) {
            *sum += c * w;
        }
        total_weight += w;
    }

    let avg = |sum: f64| {
        if total_weight > 0.0 {
            sum / total_weight
        } else {
            DEGENERATE_CHANNEL
        }
    };
    let color = ColorFraction::new(avg(sums[0]), avg(sums[1]), avg(sums[2])).clamped();

    if !color.is_valid() {
        return Err(ResolutionFailure::InvalidNumeric {
            red: color.red,
            green: color.green,
            blue: color.blue,
        });
    }
    Ok(color)
}

#[cfg(test)]
#[path = "../../tests/unit/interp/resolve.rs"]
mod tests;
