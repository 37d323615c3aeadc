use std::sync::Arc;

use crate::foundation::error::{AtlasError, AtlasResult};
use crate::geometry::region::RegionSet;
use crate::interp::frame::Frame;
use crate::render::svg::{MapLayout, frame_svg};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as `[r, g, b, a]`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Turns [`Frame`]s into pixels: SVG document, then `resvg` rasterization.
pub struct MapRenderer {
    layout: MapLayout,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl MapRenderer {
    /// Renderer using system fonts for the labels.
    pub fn new(layout: MapLayout) -> AtlasResult<Self> {
        layout.extent.validate()?;
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if db.faces().next().is_none() {
            tracing::warn!("no system fonts found; map labels will not be drawn");
        }
        Ok(Self {
            layout,
            fontdb: Arc::new(db),
        })
    }

    /// The layout frames are drawn with.
    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    /// SVG source for one frame.
    pub fn svg(&self, frame: &Frame, regions: &RegionSet) -> String {
        frame_svg(frame, regions, &self.layout)
    }

    /// Rasterize one frame. Output is opaque, so the premultiplied and straight forms agree.
    pub fn render(&self, frame: &Frame, regions: &RegionSet) -> AtlasResult<FrameRGBA> {
        let svg = self.svg(frame, regions);
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| AtlasError::render(format!("failed to parse map svg: {e}")))?;

        let canvas = self.layout.canvas;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| AtlasError::render("failed to allocate map pixmap"))?;
        pixmap.fill(resvg::tiny_skia::Color::WHITE);

        let sx = canvas.width as f32 / tree.size().width();
        let sy = canvas.height as f32 / tree.size().height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
