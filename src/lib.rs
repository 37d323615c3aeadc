//! chroma-atlas turns point samples of color usage in paintings into year-by-year choropleth maps.
//!
//! Each sample is a painting's year, location and red/green/blue share. For every distinct year,
//! every region gets a color blended from the nearest samples of that year (inverse-distance
//! weighting), and the year's dominant channel is reported. The pipeline is:
//!
//! - Load a [`SampleStore`] through a [`SampleProvider`] cascade (CSV, then demo data)
//! - Load a [`RegionSet`] through a [`RegionProvider`] cascade (GeoJSON, then a synthetic region)
//! - Drive a [`SequenceDriver`] into a [`FrameSink`] (PNG frames, JSON, animation)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod encode;
mod extract;
mod foundation;
mod geometry;
mod ingest;
mod interp;
mod render;

pub use crate::foundation::core::{Canvas, ColorFraction, FrameIndex, GeoPoint, HexColor};
pub use crate::foundation::error::{AtlasError, AtlasResult};

pub use crate::ingest::provider::{SampleProvider, demo_samples, load_samples, load_samples_csv};
pub use crate::ingest::sample::{
    DEFAULT_FRACTION, DEFAULT_YEAR, Sample, YEAR_MAX, YEAR_MIN, clamp_year,
};
pub use crate::ingest::store::SampleStore;
pub use crate::ingest::table::{
    COL_BLUE, COL_GREEN, COL_LATITUDE, COL_LONGITUDE, COL_RED, COL_YEAR, RawTable, TextEncoding,
    append_sample_csv, decode_text, read_table, write_samples_csv,
};

pub use crate::geometry::geojson::parse_regions;
pub use crate::geometry::provider::{
    RegionProvider, default_region_sources, load_regions, load_regions_geojson, region_cascade,
};
pub use crate::geometry::region::{
    EUROPEAN_COUNTRIES, Region, RegionSet, SYNTHETIC_REGION_NAME, is_european, ring_boundary,
};

pub use crate::interp::frame::{
    DominantChannel, Frame, RegionColor, YearFrameBuilder, dominant_channel,
};
pub use crate::interp::resolve::{
    K_NEAREST, Resolution, ResolutionFailure, resolve, resolve_at, try_resolve_at,
};
pub use crate::interp::sequence::{DriveReport, FrameSequence, SequenceDriver, SequenceStatus};
pub use crate::interp::weight::{EPSILON, inverse_distance_weights, planar_distance, weight};

pub use crate::encode::ensure_parent_dir;
pub use crate::encode::ffmpeg::{FfmpegEncoder, Mp4Assembler, Mp4Config, is_ffmpeg_on_path};
pub use crate::encode::gif::GifAssembler;
pub use crate::encode::png::{
    AnimationAssembler, PngDirSink, frame_file_name, read_png, write_png,
};
pub use crate::encode::sink::{FanoutSink, FrameSink, InMemorySink, JsonSink, SinkConfig};

pub use crate::render::raster::{FrameRGBA, MapRenderer};
pub use crate::render::svg::{DEFAULT_TITLE, MapExtent, MapLayout, frame_svg, region_path};

pub use crate::extract::colors::{
    DEFAULT_MIN_PERCENT, MAX_ANALYSIS_SIDE, Swatch, channel_fractions, dominant_swatches,
};

pub use crate::config::{AnimationConfig, AnimationFormat, DEFAULT_DEMO_SEED, RunConfig};

/// `BezPath` is part of the [`region_path`] signature.
pub use kurbo::BezPath;
