use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    encode::png::{AnimationAssembler, read_png},
    foundation::error::{AtlasError, AtlasResult},
    render::raster::FrameRGBA,
};

/// Settings for an MP4 written through the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct Mp4Config {
    /// Frame width in pixels (even).
    pub width: u32,
    /// Frame height in pixels (even).
    pub height: u32,
    /// How long each frame stays on screen.
    pub frame_delay_ms: u32,
    /// Destination file.
    pub out_path: PathBuf,
    /// Replace an existing file.
    pub overwrite: bool,
}

impl Mp4Config {
    /// Check dimensions and timing.
    pub fn validate(&self) -> AtlasResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AtlasError::validation("mp4 width/height must be non-zero"));
        }
        if self.frame_delay_ms == 0 {
            return Err(AtlasError::validation("frame delay must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output needs even dimensions.
            return Err(AtlasError::validation(
                "mp4 width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }

    /// Frame rate as an ffmpeg rational, e.g. `1000/500`.
    fn rate(&self) -> String {
        format!("1000/{}", self.frame_delay_ms)
    }
}

/// Return `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Streams raw RGBA frames into an `ffmpeg` child process.
pub struct FfmpegEncoder {
    cfg: Mp4Config,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl FfmpegEncoder {
    /// Spawn `ffmpeg` for `cfg`.
    pub fn new(cfg: Mp4Config) -> AtlasResult<Self> {
        cfg.validate()?;
        crate::encode::ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(AtlasError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(AtlasError::encode(
                "ffmpeg is required for MP4 output, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if cfg.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.rate(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd
            .spawn()
            .map_err(|e| AtlasError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AtlasError::encode("failed to open ffmpeg stdin"))?;

        Ok(Self {
            scratch: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            child,
            stdin: Some(stdin),
        })
    }

    /// Write one frame. Translucent pixels are flattened over white.
    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> AtlasResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(AtlasError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        flatten_over_white(&mut self.scratch, &frame.data, frame.premultiplied)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(AtlasError::encode("ffmpeg encoder is already finalized"));
        };
        stdin
            .write_all(&self.scratch)
            .map_err(|e| AtlasError::encode(format!("failed to write frame to ffmpeg: {e}")))
    }

    /// Close the input and wait for `ffmpeg` to finish the file.
    pub fn finish(mut self) -> AtlasResult<()> {
        drop(self.stdin.take());
        let output = self
            .child
            .wait_with_output()
            .map_err(|e| AtlasError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AtlasError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// MP4 from the frame PNGs via [`FfmpegEncoder`].
#[derive(Clone, Debug)]
pub struct Mp4Assembler {
    out_path: PathBuf,
    frame_delay_ms: u32,
}

impl Mp4Assembler {
    /// Assembler writing `out_path` with `frame_delay_ms` per frame.
    pub fn new(out_path: impl Into<PathBuf>, frame_delay_ms: u32) -> Self {
        Self {
            out_path: out_path.into(),
            frame_delay_ms,
        }
    }
}

impl AnimationAssembler for Mp4Assembler {
    fn out_path(&self) -> &Path {
        &self.out_path
    }

    fn assemble(&mut self, frames: &[PathBuf]) -> AtlasResult<()> {
        let Some((first, rest)) = frames.split_first() else {
            return Ok(());
        };
        let first = read_png(first)?;
        let mut encoder = FfmpegEncoder::new(Mp4Config {
            width: first.width,
            height: first.height,
            frame_delay_ms: self.frame_delay_ms,
            out_path: self.out_path.clone(),
            overwrite: true,
        })?;
        encoder.encode_frame(&first)?;
        for path in rest {
            encoder.encode_frame(&read_png(path)?)?;
        }
        encoder.finish()
    }
}

fn flatten_over_white(dst: &mut [u8], src: &[u8], src_is_premul: bool) -> AtlasResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(AtlasError::encode(
            "frame data size does not match width*height*4",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for (dc, &sc) in d[..3].iter_mut().zip(&s[..3]) {
            let fg = if src_is_premul {
                u16::from(sc)
            } else {
                mul_div255(u16::from(sc), a)
            };
            *dc = (fg + inv).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
