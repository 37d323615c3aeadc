//! Map drawing: SVG document per frame, rasterized with `resvg`.

pub(crate) mod raster;
pub(crate) mod svg;
