use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AtlasError, AtlasResult};
use crate::geometry::region::RegionSet;
use crate::interp::frame::Frame;
use crate::render::raster::{FrameRGBA, MapRenderer};

/// Turns the written frame images into a single animation file.
pub trait AnimationAssembler: Send {
    /// Destination file.
    fn out_path(&self) -> &Path;
    /// Assemble `frames` (PNG paths, in playback order).
    fn assemble(&mut self, frames: &[PathBuf]) -> AtlasResult<()>;
}

impl<A: AnimationAssembler + ?Sized> AnimationAssembler for Box<A> {
    fn out_path(&self) -> &Path {
        (**self).out_path()
    }

    fn assemble(&mut self, frames: &[PathBuf]) -> AtlasResult<()> {
        (**self).assemble(frames)
    }
}

/// File name of the frame image at `idx` for `year`: `frame_NNN_YEAR.png`.
pub fn frame_file_name(idx: FrameIndex, year: i32) -> String {
    format!("frame_{:03}_{year}.png", idx.0)
}

/// Write an RGBA frame as PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> AtlasResult<()> {
    crate::encode::ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| AtlasError::encode(format!("failed to write '{}': {e}", path.display())))
}

/// Read a frame image back as straight RGBA8.
pub fn read_png(path: &Path) -> AtlasResult<FrameRGBA> {
    let img = image::open(path)
        .map_err(|e| AtlasError::encode(format!("failed to read '{}': {e}", path.display())))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(FrameRGBA {
        width,
        height,
        data: img.into_raw(),
        premultiplied: false,
    })
}

/// Renders every frame to `out_dir/frame_NNN_YEAR.png` and optionally assembles an animation.
///
/// Assembly runs in `end` over the frames written during this run. It is best-effort from the
/// driver's point of view: its error is reported, the PNGs stay on disk.
pub struct PngDirSink<'a> {
    out_dir: PathBuf,
    regions: &'a RegionSet,
    renderer: MapRenderer,
    assembler: Option<Box<dyn AnimationAssembler + 'a>>,
    written: Vec<PathBuf>,
}

impl<'a> PngDirSink<'a> {
    /// Sink writing into `out_dir` using `renderer`.
    pub fn new(out_dir: impl Into<PathBuf>, regions: &'a RegionSet, renderer: MapRenderer) -> Self {
        Self {
            out_dir: out_dir.into(),
            regions,
            renderer,
            assembler: None,
            written: Vec::new(),
        }
    }

    /// Assemble an animation from the written frames in `end`.
    pub fn with_assembler(mut self, assembler: impl AnimationAssembler + 'a) -> Self {
        self.assembler = Some(Box::new(assembler));
        self
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngDirSink<'_> {
    fn begin(&mut self, cfg: SinkConfig) -> AtlasResult<()> {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| {
            AtlasError::encode(format!(
                "failed to create frame directory '{}': {e}",
                self.out_dir.display()
            ))
        })?;
        self.written = Vec::with_capacity(cfg.frame_count);
        tracing::info!(dir = %self.out_dir.display(), frames = cfg.frame_count, "writing png frames");
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> AtlasResult<()> {
        let pixels = self.renderer.render(frame, self.regions)?;
        let path = self.out_dir.join(frame_file_name(idx, frame.year));
        write_png(&path, &pixels)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> AtlasResult<()> {
        tracing::info!(dir = %self.out_dir.display(), frames = self.written.len(), "frames saved");
        let Some(assembler) = self.assembler.as_mut() else {
            return Ok(());
        };
        if self.written.is_empty() {
            tracing::warn!("no frames were written; skipping animation");
            return Ok(());
        }
        (**assembler).assemble(&self.written)?;
        tracing::info!(path = %(**assembler).out_path().display(), "animation created");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
