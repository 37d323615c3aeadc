use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AtlasError, AtlasResult};
use crate::interp::frame::Frame;

/// Information handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Number of frames that will be pushed.
    pub frame_count: usize,
    /// Years in push order (ascending).
    pub years: Vec<i32>,
}

/// Consumer of frames in year order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex` values, starting
/// at 0, and ascending years.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> AtlasResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> AtlasResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> AtlasResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn begin(&mut self, cfg: SinkConfig) -> AtlasResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> AtlasResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> AtlasResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> AtlasResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> AtlasResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> AtlasResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Collects every frame and writes them as one JSON array on `end`.
pub struct JsonSink {
    out_path: std::path::PathBuf,
    frames: Vec<Frame>,
}

impl JsonSink {
    /// Create a sink writing to `out_path`.
    pub fn new(out_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            frames: Vec::new(),
        }
    }
}

impl FrameSink for JsonSink {
    fn begin(&mut self, cfg: SinkConfig) -> AtlasResult<()> {
        crate::encode::ensure_parent_dir(&self.out_path)?;
        self.frames = Vec::with_capacity(cfg.frame_count);
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &Frame) -> AtlasResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> AtlasResult<()> {
        let json = serde_json::to_vec_pretty(&self.frames)
            .map_err(|e| AtlasError::serde(format!("failed to serialize frames: {e}")))?;
        std::fs::write(&self.out_path, json).map_err(|e| {
            AtlasError::encode(format!(
                "failed to write '{}': {e}",
                self.out_path.display()
            ))
        })?;
        tracing::info!(path = %self.out_path.display(), frames = self.frames.len(), "wrote frame data");
        Ok(())
    }
}

/// Forwards every call to each inner sink in order.
///
/// `push_frame` and `end` visit every sink even after one fails; the first error is returned.
#[derive(Default)]
pub struct FanoutSink<'a> {
    sinks: Vec<Box<dyn FrameSink + 'a>>,
}

impl<'a> FanoutSink<'a> {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink.
    pub fn push(&mut self, sink: impl FrameSink + 'a) {
        self.sinks.push(Box::new(sink));
    }

    /// Number of inner sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Return `true` when no sinks were added.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl FrameSink for FanoutSink<'_> {
    fn begin(&mut self, cfg: SinkConfig) -> AtlasResult<()> {
        for sink in &mut self.sinks {
            sink.begin(cfg.clone())?;
        }
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> AtlasResult<()> {
        first_error(self.sinks.iter_mut().map(|s| s.push_frame(idx, frame)))
    }

    fn end(&mut self) -> AtlasResult<()> {
        first_error(self.sinks.iter_mut().map(|s| s.end()))
    }
}

fn first_error(results: impl Iterator<Item = AtlasResult<()>>) -> AtlasResult<()> {
    let mut first = None;
    for r in results {
        if let Err(e) = r
            && first.is_none()
        {
            first = Some(e);
        }
    }
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
