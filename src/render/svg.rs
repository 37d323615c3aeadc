use std::fmt::Write as _;

use geo::MultiPolygon;
use kurbo::{BezPath, Point};

use crate::foundation::core::{Canvas, HexColor};
use crate::foundation::error::{AtlasError, AtlasResult};
use crate::geometry::region::RegionSet;
use crate::interp::frame::Frame;

/// Geographic window drawn onto the canvas, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MapExtent {
    /// Western edge.
    pub lon_min: f64,
    /// Eastern edge.
    pub lon_max: f64,
    /// Southern edge.
    pub lat_min: f64,
    /// Northern edge.
    pub lat_max: f64,
}

impl Default for MapExtent {
    fn default() -> Self {
        Self {
            lon_min: -25.0,
            lon_max: 40.0,
            lat_min: 35.0,
            lat_max: 75.0,
        }
    }
}

impl MapExtent {
    /// Reject empty, inverted or non-finite windows.
    pub fn validate(&self) -> AtlasResult<()> {
        let all_finite = [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(AtlasError::validation("map extent must be finite"));
        }
        if self.lon_min >= self.lon_max || self.lat_min >= self.lat_max {
            return Err(AtlasError::validation(format!(
                "map extent is empty: lon {}..{}, lat {}..{}",
                self.lon_min, self.lon_max, self.lat_min, self.lat_max
            )));
        }
        Ok(())
    }
}

/// Canvas layout for a map frame: the plot rectangle sits below a title band.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Geographic window.
    pub extent: MapExtent,
    /// Heading drawn above the map.
    pub title: String,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            extent: MapExtent::default(),
            title: DEFAULT_TITLE.to_owned(),
        }
    }
}

/// Default heading.
pub const DEFAULT_TITLE: &str = "Color Usage in European Paintings (1900-2000)";

const OUTLINE_WIDTH: f64 = 0.5;
const MARGIN_X: f64 = 0.05;
const MARGIN_TOP: f64 = 0.08;
const MARGIN_BOTTOM: f64 = 0.04;

impl MapLayout {
    fn plot_rect(&self) -> kurbo::Rect {
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);
        kurbo::Rect::new(
            w * MARGIN_X,
            h * MARGIN_TOP,
            w * (1.0 - MARGIN_X),
            h * (1.0 - MARGIN_BOTTOM),
        )
    }

    /// Project `(lon, lat)` into canvas pixels (equirectangular, y down).
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let r = self.plot_rect();
        let e = &self.extent;
        let x = r.x0 + (lon - e.lon_min) / (e.lon_max - e.lon_min) * r.width();
        let y = r.y1 - (lat - e.lat_min) / (e.lat_max - e.lat_min) * r.height();
        Point::new(x, y)
    }

    fn font_size(&self, base: f64) -> f64 {
        (base * f64::from(self.canvas.height) / 1000.0).max(6.0)
    }
}

/// Outline of a multipolygon as one path; each ring is its own closed subpath.
pub fn region_path(boundary: &MultiPolygon<f64>, layout: &MapLayout) -> BezPath {
    let mut path = BezPath::new();
    for polygon in boundary {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            let mut coords = ring.coords();
            let Some(first) = coords.next() else {
                continue;
            };
            path.move_to(layout.project(first.x, first.y));
            for c in coords {
                path.line_to(layout.project(c.x, c.y));
            }
            path.close_path();
        }
    }
    path
}

/// Build the SVG document for one frame.
///
/// Regions are drawn in set order. A region missing from `frame` is drawn with the sentinel color.
pub fn frame_svg(frame: &Frame, regions: &RegionSet, layout: &MapLayout) -> String {
    let w = layout.canvas.width;
    let h = layout.canvas.height;
    let mut out = String::with_capacity(4096 + regions.len() * 2048);

    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(out, r##"<rect width="{w}" height="{h}" fill="#FFFFFF"/>"##);

    let _ = write!(
        out,
        r##"<g stroke="#000000" stroke-width="{OUTLINE_WIDTH}" stroke-linejoin="round" fill-rule="evenodd">"##
    );
    for (i, region) in regions.iter().enumerate() {
        let color = match frame.regions.get(i) {
            Some(slot) if slot.name == region.name() => slot.color,
            _ => frame.color_of(region.name()).unwrap_or(HexColor::SENTINEL),
        };
        let path = region_path(region.boundary(), layout);
        if path.elements().is_empty() {
            continue;
        }
        let _ = write!(
            out,
            r#"<path d="{}" fill="{color}"><title>{}</title></path>"#,
            path.to_svg(),
            escape_xml(region.name())
        );
    }
    out.push_str("</g>");

    let plot = layout.plot_rect();
    let title_size = layout.font_size(16.0 * 1.6);
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{title_size}" text-anchor="middle">{}</text>"#,
        f64::from(w) / 2.0,
        plot.y0 - title_size * 0.6,
        escape_xml(&layout.title)
    );

    let label_size = layout.font_size(14.0 * 1.6);
    let pad = label_size * 0.4;
    let baseline = plot.y1 - label_size * 0.8;
    label(
        &mut out,
        &format!("Year: {}", frame.year),
        plot.x0 + plot.width() * 0.02,
        baseline,
        label_size,
        pad,
        Anchor::Start,
    );
    if let Some(channel) = frame.dominant_channel {
        label(
            &mut out,
            &format!("Dominant: {channel}"),
            plot.x1 - plot.width() * 0.02,
            baseline,
            label_size,
            pad,
            Anchor::End,
        );
    }

    out.push_str("</svg>");
    out
}

#[derive(Clone, Copy)]
enum Anchor {
    Start,
    End,
}

/// Text on a translucent white box. Box width is estimated from the character count.
fn label(out: &mut String, text: &str, x: f64, baseline: f64, size: f64, pad: f64, anchor: Anchor) {
    let approx_w = text.chars().count() as f64 * size * 0.55;
    let (box_x, anchor_attr) = match anchor {
        Anchor::Start => (x - pad, "start"),
        Anchor::End => (x - approx_w - pad, "end"),
    };
    let _ = write!(
        out,
        r##"<rect x="{box_x}" y="{}" width="{}" height="{}" fill="#FFFFFF" fill-opacity="0.7" stroke="#000000" stroke-width="0.5"/>"##,
        baseline - size - pad * 0.5,
        approx_w + 2.0 * pad,
        size + 2.0 * pad
    );
    let _ = write!(
        out,
        r#"<text x="{x}" y="{baseline}" font-family="sans-serif" font-size="{size}" text-anchor="{anchor_attr}">{}</text>"#,
        escape_xml(text)
    );
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
