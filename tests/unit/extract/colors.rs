use super::*;
use image::{Rgb, RgbImage};

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb)))
}

#[test]
fn fractions_are_channel_shares_of_total_intensity() {
    let c = channel_fractions(&solid(4, 4, [200, 100, 100]));
    assert!((c.red - 0.5).abs() < 1e-12);
    assert!((c.green - 0.25).abs() < 1e-12);
    assert!((c.blue - 0.25).abs() < 1e-12);
    assert!((c.red + c.green + c.blue - 1.0).abs() < 1e-12);
}

#[test]
fn all_black_image_reports_neutral_default() {
    let c = channel_fractions(&solid(3, 3, [0, 0, 0]));
    assert_eq!(c, ColorFraction::new(0.33, 0.33, 0.33));
}

#[test]
fn large_images_are_downscaled_without_changing_a_flat_color() {
    let img = solid(2000, 500, [30, 60, 90]);
    assert_eq!(downscaled(&img).dimensions(), (1000, 250));

    let c = channel_fractions(&img);
    assert!((c.red - 30.0 / 180.0).abs() < 1e-3);
    assert!((c.blue - 90.0 / 180.0).abs() < 1e-3);
}

#[test]
fn small_images_are_not_resized() {
    let img = solid(1000, 10, [1, 2, 3]);
    assert_eq!(downscaled(&img).dimensions(), (1000, 10));
}

#[test]
fn swatches_below_threshold_are_dropped_and_sorted_by_share() {
    // 6 red, 3 blue, 1 green pixel.
    let mut img = RgbImage::from_pixel(10, 1, Rgb([250, 10, 10]));
    for x in 6..9 {
        img.put_pixel(x, 0, Rgb([10, 10, 250]));
    }
    img.put_pixel(9, 0, Rgb([10, 250, 10]));

    let swatches = dominant_swatches(&DynamicImage::ImageRgb8(img.clone()), 20.0);
    assert_eq!(swatches.len(), 2);
    assert_eq!(swatches[0].color.to_string(), "#FA0A0A");
    assert!((swatches[0].percent - 60.0).abs() < 1e-9);
    assert_eq!(swatches[1].color.to_string(), "#0A0AFA");

    let all = dominant_swatches(&DynamicImage::ImageRgb8(img), DEFAULT_MIN_PERCENT);
    assert_eq!(all.len(), 3);
}

#[test]
fn similar_shades_share_a_bucket_and_report_their_mean() {
    let mut img = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));
    img.put_pixel(1, 0, Rgb([102, 100, 98]));
    let swatches = dominant_swatches(&DynamicImage::ImageRgb8(img), 0.0);
    assert_eq!(swatches.len(), 1);
    assert_eq!(swatches[0].color, HexColor([101, 100, 99]));
    assert!((swatches[0].percent - 100.0).abs() < 1e-9);
}
