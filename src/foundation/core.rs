use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{AtlasError, AtlasResult};

/// 0-based position of a frame in the emitted year sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> AtlasResult<Self> {
        if width == 0 || height == 0 {
            return Err(AtlasError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1000,
        }
    }
}

/// A `(latitude, longitude)` pair in degrees.
///
/// `(0, 0)` doubles as the "unknown location" sentinel for samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The unknown-location sentinel.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Per-channel color fractions, each expected in `[0, 1]`.
///
/// Channels are independent; they need not sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorFraction {
    /// Red fraction.
    pub red: f64,
    /// Green fraction.
    pub green: f64,
    /// Blue fraction.
    pub blue: f64,
}

impl ColorFraction {
    /// Create a fraction triple without clamping.
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Clamp every channel independently into `[0, 1]`. NaN stays NaN.
    pub fn clamped(self) -> Self {
        Self {
            red: self.red.clamp(0.0, 1.0),
            green: self.green.clamp(0.0, 1.0),
            blue: self.blue.clamp(0.0, 1.0),
        }
    }

    /// Return `true` when every channel is a number inside `[0, 1]`.
    pub fn is_valid(self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|c| !c.is_nan() && (0.0..=1.0).contains(c))
    }

    /// Channels in fixed `[red, green, blue]` order.
    pub fn channels(self) -> [f64; 3] {
        [self.red, self.green, self.blue]
    }

    /// Convert to a hex color, rounding `channel * 255` to the nearest byte (halves to even).
    ///
    /// Channels are clamped first; callers that must reject out-of-range input check
    /// [`ColorFraction::is_valid`] beforehand.
    pub fn to_hex(self) -> HexColor {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round_ties_even() as u8
        }
        HexColor([to_u8(self.red), to_u8(self.green), to_u8(self.blue)])
    }
}

/// An opaque sRGB color formatted as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    /// Gray used whenever no valid color can be computed.
    pub const SENTINEL: HexColor = HexColor([0xCC, 0xCC, 0xCC]);

    /// Decode back into fractions on the `[0, 1]` scale.
    pub fn to_fraction(self) -> ColorFraction {
        let [r, g, b] = self.0;
        ColorFraction::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Return `true` for the no-data sentinel.
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl FromStr for HexColor {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(AtlasError::validation(format!(
                "hex color must be #RRGGBB, got \"{s}\""
            )));
        }

        let byte = |pair: &str| {
            u8::from_str_radix(pair, 16)
                .map_err(|_| AtlasError::validation(format!("invalid hex byte \"{pair}\"")))
        };
        Ok(Self([byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?]))
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
