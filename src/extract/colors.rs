use std::collections::HashMap;

use image::{DynamicImage, GenericImageView as _, imageops::FilterType};

use crate::foundation::core::{ColorFraction, HexColor};
use crate::ingest::sample::DEFAULT_FRACTION;

/// Long-side limit applied before summing channels.
pub const MAX_ANALYSIS_SIDE: u32 = 1000;

/// Default minimum share, in percent, for [`dominant_swatches`].
pub const DEFAULT_MIN_PERCENT: f64 = 10.0;

/// Bucket width per channel when grouping similar colors.
const QUANT_STEP: u8 = 32;

/// Share of each RGB channel in the total channel intensity of an image.
///
/// Images larger than [`MAX_ANALYSIS_SIDE`] are first downscaled (Lanczos3). An all-black image
/// has no intensity to share and reports the neutral default for every channel.
pub fn channel_fractions(img: &DynamicImage) -> ColorFraction {
    let rgb = downscaled(img).to_rgb8();

    let mut sums = [0u64; 3];
    for px in rgb.pixels() {
        for (sum, &v) in sums.iter_mut().zip(&px.0) {
            *sum += u64::from(v);
        }
    }
    let total: u64 = sums.iter().sum();
    if total == 0 {
        return ColorFraction::new(DEFAULT_FRACTION, DEFAULT_FRACTION, DEFAULT_FRACTION);
    }
    let t = total as f64;
    ColorFraction::new(sums[0] as f64 / t, sums[1] as f64 / t, sums[2] as f64 / t)
}

fn downscaled(img: &DynamicImage) -> DynamicImage {
    let (w, h) = img.dimensions();
    let long = w.max(h);
    if long <= MAX_ANALYSIS_SIDE {
        return img.clone();
    }
    let ratio = f64::from(MAX_ANALYSIS_SIDE) / f64::from(long);
    let nw = ((f64::from(w) * ratio) as u32).max(1);
    let nh = ((f64::from(h) * ratio) as u32).max(1);
    tracing::debug!(from_w = w, from_h = h, to_w = nw, to_h = nh, "downscaling for analysis");
    img.resize_exact(nw, nh, FilterType::Lanczos3)
}

/// A color that covers a notable share of an image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Swatch {
    /// Mean color of the pixels in the bucket.
    pub color: HexColor,
    /// Share of all pixels, in percent.
    pub percent: f64,
}

/// Colors covering at least `min_percent` of the pixels, largest share first.
///
/// Pixels are grouped into coarse RGB buckets; each swatch reports the mean color of its bucket.
/// Equal shares keep bucket order (darker first) so the output is deterministic.
pub fn dominant_swatches(img: &DynamicImage, min_percent: f64) -> Vec<Swatch> {
    let rgb = img.to_rgb8();
    let total = u64::from(rgb.width()) * u64::from(rgb.height());
    if total == 0 {
        return Vec::new();
    }

    let mut buckets: HashMap<[u8; 3], (u64, [u64; 3])> = HashMap::new();
    for px in rgb.pixels() {
        let key = px.0.map(|v| v / QUANT_STEP);
        let entry = buckets.entry(key).or_insert((0, [0; 3]));
        entry.0 += 1;
        for (sum, &v) in entry.1.iter_mut().zip(&px.0) {
            *sum += u64::from(v);
        }
    }

    let mut ranked: Vec<([u8; 3], u64, [u64; 3])> = buckets
        .into_iter()
        .map(|(key, (count, sums))| (key, count, sums))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .filter_map(|(_, count, sums)| {
            let percent = count as f64 * 100.0 / total as f64;
            if percent < min_percent {
                return None;
            }
            let mean = sums.map(|s| ((s as f64 / count as f64).round()) as u8);
            Some(Swatch {
                color: HexColor(mean),
                percent,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/extract/colors.rs"]
mod tests;
