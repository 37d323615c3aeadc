use crate::foundation::core::{ColorFraction, GeoPoint};

/// Earliest accepted sample year.
pub const YEAR_MIN: i32 = 0;
/// Latest accepted sample year.
pub const YEAR_MAX: i32 = 3000;
/// Year assigned to samples that do not carry one.
pub const DEFAULT_YEAR: i32 = 2000;
/// Fraction assigned to a color channel that is missing.
pub const DEFAULT_FRACTION: f64 = 0.33;

/// One observed `(year, location, color)` data point.
///
/// Construction sanitizes every field, so a `Sample` never holds a NaN, an out-of-range channel,
/// or a year outside `[YEAR_MIN, YEAR_MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    /// Calendar year of the artwork.
    pub year: i32,
    /// Where the artwork was created.
    pub location: GeoPoint,
    /// Channel fractions in `[0, 1]`.
    pub color: ColorFraction,
}

impl Sample {
    /// Create a sample from already-normalized fractions.
    ///
    /// Channels are clamped into `[0, 1]`; NaN channels fall back to [`DEFAULT_FRACTION`] and
    /// non-finite coordinates to the unknown-location sentinel.
    pub fn new(year: i32, location: GeoPoint, color: ColorFraction) -> Self {
        Self {
            year: clamp_year(year),
            location: sanitize_location(location),
            color: sanitize_color(color),
        }
    }
}

/// Clamp a year into the accepted epoch range.
pub fn clamp_year(year: i32) -> i32 {
    year.clamp(YEAR_MIN, YEAR_MAX)
}

/// Convert a raw year cell into a sanitized year.
///
/// Missing or non-finite values become [`DEFAULT_YEAR`]; fractional years truncate.
pub(crate) fn year_from_raw(raw: Option<f64>) -> i32 {
    match raw {
        Some(v) if v.is_finite() => {
            let v = v.trunc().clamp(f64::from(YEAR_MIN), f64::from(YEAR_MAX));
            v as i32
        }
        _ => DEFAULT_YEAR,
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn sanitize_location(p: GeoPoint) -> GeoPoint {
    GeoPoint::new(finite_or_zero(p.lat), finite_or_zero(p.lon))
}

fn sanitize_color(c: ColorFraction) -> ColorFraction {
    fn channel(v: f64) -> f64 {
        if v.is_nan() {
            DEFAULT_FRACTION
        } else {
            v.clamp(0.0, 1.0)
        }
    }
    ColorFraction::new(channel(c.red), channel(c.green), channel(c.blue))
}
