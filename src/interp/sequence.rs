use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AtlasError, AtlasResult};
use crate::geometry::region::RegionSet;
use crate::ingest::store::SampleStore;
use crate::interp::frame::{Frame, YearFrameBuilder};

/// Lazy, single-pass sequence of frames, one per distinct year, ascending.
pub struct FrameSequence<'a> {
    years: std::vec::IntoIter<i32>,
    regions: &'a RegionSet,
    samples: &'a SampleStore,
    builder: YearFrameBuilder,
}

impl FrameSequence<'_> {
    /// Return `true` when no frames remain.
    pub fn is_empty(&self) -> bool {
        self.years.len() == 0
    }
}

impl Iterator for FrameSequence<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let year = self.years.next()?;
        Some(self.builder.build(year, self.regions, self.samples))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.years.size_hint()
    }
}

impl ExactSizeIterator for FrameSequence<'_> {}

/// Outcome of [`SequenceDriver::drive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceStatus {
    /// At least one year was found and pushed.
    Completed,
    /// The sample set contained no years; nothing was pushed.
    Empty,
}

/// Counters and conditions reported by [`SequenceDriver::drive`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriveReport {
    /// Whether any year was present.
    pub status: SequenceStatus,
    /// Frames the sink accepted.
    pub frames_written: u64,
    /// Frames the sink rejected (logged and skipped).
    pub frames_failed: u64,
    /// Error from the sink's finalization step (e.g. animation assembly), if any.
    ///
    /// Frames already written stay valid when this is set.
    pub finalize_error: Option<String>,
}

/// Drives per-year frame building over every year in a sample store.
pub struct SequenceDriver<'a> {
    samples: &'a SampleStore,
    regions: &'a RegionSet,
    builder: YearFrameBuilder,
    threads: Option<usize>,
}

impl<'a> SequenceDriver<'a> {
    /// Sequential driver over `samples` and `regions`.
    pub fn new(samples: &'a SampleStore, regions: &'a RegionSet) -> Self {
        Self {
            samples,
            regions,
            builder: YearFrameBuilder::new(),
            threads: None,
        }
    }

    /// Resolve regions in parallel. `threads` of `None` uses the rayon default pool size.
    pub fn with_parallelism(mut self, parallel: bool, threads: Option<usize>) -> Self {
        self.builder.parallel = parallel;
        self.threads = threads;
        self
    }

    /// Distinct years in visit order.
    pub fn years(&self) -> Vec<i32> {
        self.samples.years().collect()
    }

    /// The frame sequence. Empty (with a warning) when there are no samples.
    pub fn run(&self) -> FrameSequence<'a> {
        let years = self.years();
        if years.is_empty() {
            tracing::warn!("no years found in the data");
        }
        FrameSequence {
            years: years.into_iter(),
            regions: self.regions,
            samples: self.samples,
            builder: self.builder,
        }
    }

    /// Build every frame and push it into `sink`.
    ///
    /// A frame the sink rejects is logged and counted; the remaining years still run. A failing
    /// `sink.end()` is recorded in the report rather than returned. Only `sink.begin()` and pool
    /// construction errors abort.
    pub fn drive(&self, sink: &mut dyn FrameSink) -> AtlasResult<DriveReport> {
        let years = self.years();
        let mut report = DriveReport {
            status: SequenceStatus::Completed,
            frames_written: 0,
            frames_failed: 0,
            finalize_error: None,
        };
        if years.is_empty() {
            tracing::warn!("no years found in the data");
            report.status = SequenceStatus::Empty;
            return Ok(report);
        }

        let pool = if self.builder.parallel && self.threads.is_some() {
            Some(build_thread_pool(self.threads)?)
        } else {
            None
        };

        sink.begin(SinkConfig {
            frame_count: years.len(),
            years: years.clone(),
        })?;

        let push_all = |sink: &mut dyn FrameSink, report: &mut DriveReport| {
            for (i, frame) in self.run().enumerate() {
                let year = frame.year;
                match sink.push_frame(FrameIndex(i as u64), &frame) {
                    Ok(()) => {
                        report.frames_written += 1;
                        tracing::info!(year, index = i, "frame written");
                    }
                    Err(e) => {
                        report.frames_failed += 1;
                        tracing::error!(year, error = %e, "error processing frame");
                    }
                }
            }
        };

        match pool {
            Some(pool) => pool.install(|| push_all(sink, &mut report)),
            None => push_all(sink, &mut report),
        }

        if let Err(e) = sink.end() {
            tracing::warn!(error = %e, "sink finalization failed; written frames are kept");
            report.finalize_error = Some(e.to_string());
        }
        Ok(report)
    }
}

fn build_thread_pool(threads: Option<usize>) -> AtlasResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(AtlasError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| AtlasError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/interp/sequence.rs"]
mod tests;
