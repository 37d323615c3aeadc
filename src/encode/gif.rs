use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};

use crate::encode::png::{AnimationAssembler, read_png};
use crate::foundation::error::{AtlasError, AtlasResult};

/// Quantizer speed handed to the GIF encoder (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// Looping GIF from the frame PNGs, one fixed delay per frame.
#[derive(Clone, Debug)]
pub struct GifAssembler {
    out_path: PathBuf,
    frame_delay_ms: u32,
}

impl GifAssembler {
    /// Assembler writing `out_path` with `frame_delay_ms` per frame.
    pub fn new(out_path: impl Into<PathBuf>, frame_delay_ms: u32) -> Self {
        Self {
            out_path: out_path.into(),
            frame_delay_ms,
        }
    }
}

impl AnimationAssembler for GifAssembler {
    fn out_path(&self) -> &Path {
        &self.out_path
    }

    fn assemble(&mut self, frames: &[PathBuf]) -> AtlasResult<()> {
        crate::encode::ensure_parent_dir(&self.out_path)?;
        let file = std::fs::File::create(&self.out_path).map_err(|e| {
            AtlasError::encode(format!(
                "could not create GIF '{}': {e}",
                self.out_path.display()
            ))
        })?;

        let mut encoder = GifEncoder::new_with_speed(std::io::BufWriter::new(file), GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| AtlasError::encode(format!("could not create GIF: {e}")))?;

        let delay = image::Delay::from_numer_denom_ms(self.frame_delay_ms, 1);
        for path in frames {
            let rgba = read_png(path)?;
            let buf = image::RgbaImage::from_raw(rgba.width, rgba.height, rgba.data)
                .ok_or_else(|| AtlasError::encode("frame buffer does not match its dimensions"))?;
            encoder
                .encode_frame(image::Frame::from_parts(buf, 0, 0, delay))
                .map_err(|e| {
                    AtlasError::encode(format!(
                        "could not add '{}' to GIF: {e}",
                        path.display()
                    ))
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
