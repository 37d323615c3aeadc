use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::Mp4Assembler;
use crate::encode::gif::GifAssembler;
use crate::encode::png::AnimationAssembler;
use crate::foundation::core::Canvas;
use crate::foundation::error::{AtlasError, AtlasResult};
use crate::geometry::provider::{RegionProvider, default_region_sources, region_cascade};
use crate::ingest::provider::SampleProvider;
use crate::render::svg::{DEFAULT_TITLE, MapExtent, MapLayout};

/// Seed for the built-in demo samples.
pub const DEFAULT_DEMO_SEED: u64 = 42;

/// Animation container written after the frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationFormat {
    /// Looping GIF via the `image` crate.
    Gif,
    /// H.264 MP4 via the system `ffmpeg` binary.
    Mp4,
}

/// Animation output settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Container format.
    pub format: AnimationFormat,
    /// Destination file.
    pub path: PathBuf,
    /// Time each frame is shown, in milliseconds.
    pub frame_delay_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            format: AnimationFormat::Gif,
            path: PathBuf::from("color_usage_animation.gif"),
            frame_delay_ms: 500,
        }
    }
}

impl AnimationConfig {
    /// Check timing and, for MP4, that `canvas` can be encoded as yuv420p.
    pub fn validate(&self, canvas: Canvas) -> AtlasResult<()> {
        if self.frame_delay_ms == 0 {
            return Err(AtlasError::validation("animation.frame_delay_ms must be > 0"));
        }
        if self.path.as_os_str().is_empty() {
            return Err(AtlasError::validation("animation.path must be non-empty"));
        }
        if self.format == AnimationFormat::Mp4
            && (!canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2))
        {
            return Err(AtlasError::validation(
                "mp4 output needs an even canvas width/height",
            ));
        }
        Ok(())
    }

    /// Assembler for this format.
    pub fn assembler(&self) -> Box<dyn AnimationAssembler> {
        match self.format {
            AnimationFormat::Gif => Box::new(GifAssembler::new(&self.path, self.frame_delay_ms)),
            AnimationFormat::Mp4 => Box::new(Mp4Assembler::new(&self.path, self.frame_delay_ms)),
        }
    }
}

/// Everything one run needs. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Sample CSV. When unset (or unreadable with `demo_fallback`), demo samples are used.
    pub samples: Option<PathBuf>,
    /// Fall back to demo samples when the CSV cannot be read.
    pub demo_fallback: bool,
    /// Seed for the demo samples.
    pub demo_seed: u64,
    /// GeoJSON boundary files, tried in order before the synthetic region.
    pub region_sources: Vec<PathBuf>,
    /// Directory receiving `frame_NNN_YEAR.png`.
    pub out_dir: PathBuf,
    /// Frame size in pixels.
    pub canvas: Canvas,
    /// Geographic window.
    pub extent: MapExtent,
    /// Heading drawn on every frame.
    pub title: String,
    /// Animation assembled from the frames; `null` disables it.
    pub animation: Option<AnimationConfig>,
    /// Also write every frame's colors as JSON.
    pub export_json: Option<PathBuf>,
    /// Resolve regions concurrently.
    pub parallel: bool,
    /// Worker threads for `parallel` (rayon default when unset).
    pub threads: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples: None,
            demo_fallback: true,
            demo_seed: DEFAULT_DEMO_SEED,
            region_sources: default_region_sources(),
            out_dir: PathBuf::from("animation_frames"),
            canvas: Canvas::default(),
            extent: MapExtent::default(),
            title: DEFAULT_TITLE.to_owned(),
            animation: Some(AnimationConfig::default()),
            export_json: None,
            parallel: false,
            threads: None,
        }
    }
}

impl RunConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> AtlasResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| AtlasError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AtlasResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AtlasError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject settings that cannot produce output.
    pub fn validate(&self) -> AtlasResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        self.extent.validate()?;
        if self.samples.is_none() && !self.demo_fallback {
            return Err(AtlasError::validation(
                "no sample source: set 'samples' or enable 'demo_fallback'",
            ));
        }
        if self.threads == Some(0) {
            return Err(AtlasError::validation("'threads' must be >= 1 when set"));
        }
        if let Some(anim) = &self.animation {
            anim.validate(self.canvas)?;
        }
        Ok(())
    }

    /// Sample providers in the order they are tried.
    pub fn sample_providers(&self) -> Vec<SampleProvider> {
        let mut out = Vec::with_capacity(2);
        if let Some(path) = &self.samples {
            out.push(SampleProvider::CsvFile(path.clone()));
        }
        if self.demo_fallback {
            out.push(SampleProvider::Demo {
                seed: self.demo_seed,
            });
        }
        out
    }

    /// Region providers in the order they are tried; always ends with the synthetic region.
    pub fn region_providers(&self) -> Vec<RegionProvider> {
        region_cascade(&self.region_sources)
    }

    /// Drawing layout derived from canvas, extent and title.
    pub fn layout(&self) -> MapLayout {
        MapLayout {
            canvas: self.canvas,
            extent: self.extent,
            title: self.title.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
