use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{ColorFraction, GeoPoint};
use crate::ingest::sample::Sample;

fn sample(year: i32, lat: f64, lon: f64) -> Sample {
    Sample::new(year, GeoPoint::new(lat, lon), ColorFraction::new(0.2, 0.4, 0.6))
}

/// Accepts frames except for one year, and fails on `end`.
struct FlakySink {
    reject_year: i32,
    accepted: Vec<i32>,
}

impl FrameSink for FlakySink {
    fn begin(&mut self, _cfg: SinkConfig) -> AtlasResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &Frame) -> AtlasResult<()> {
        if frame.year == self.reject_year {
            return Err(AtlasError::encode("disk full"));
        }
        self.accepted.push(frame.year);
        Ok(())
    }

    fn end(&mut self) -> AtlasResult<()> {
        Err(AtlasError::encode("could not create GIF"))
    }
}

#[test]
fn years_are_visited_ascending_and_deduplicated() {
    let store = SampleStore::from_samples([
        sample(1950, 1.0, 1.0),
        sample(1900, 1.0, 1.0),
        sample(1950, 2.0, 2.0),
        sample(1925, 1.0, 1.0),
    ]);
    let regions = RegionSet::synthetic_europe();
    let driver = SequenceDriver::new(&store, &regions);

    let seq = driver.run();
    assert_eq!(seq.len(), 3);
    let years: Vec<i32> = seq.map(|f| f.year).collect();
    assert_eq!(years, vec![1900, 1925, 1950]);
}

#[test]
fn empty_store_yields_empty_sequence_and_empty_status() {
    let store = SampleStore::default();
    let regions = RegionSet::synthetic_europe();
    let driver = SequenceDriver::new(&store, &regions);

    assert!(driver.run().is_empty());
    assert_eq!(driver.run().count(), 0);

    let mut sink = InMemorySink::new();
    let report = driver.drive(&mut sink).unwrap();
    assert_eq!(report.status, SequenceStatus::Empty);
    assert_eq!(report.frames_written, 0);
    assert!(sink.config().is_none());
    assert!(!sink.is_finished());
}

#[test]
fn recomputing_a_sequence_is_idempotent() {
    let store = crate::ingest::provider::demo_samples(11);
    let regions = RegionSet::synthetic_europe();
    let driver = SequenceDriver::new(&store, &regions);
    let a: Vec<Frame> = driver.run().collect();
    let b: Vec<Frame> = driver.run().collect();
    assert_eq!(a, b);
    assert_eq!(a.len(), 21);
}

#[test]
fn drive_pushes_indexed_frames_in_order() {
    let store = SampleStore::from_samples([sample(1910, 50.0, 10.0), sample(1905, 40.0, 0.0)]);
    let regions = RegionSet::synthetic_europe();
    let mut sink = InMemorySink::new();

    let report = SequenceDriver::new(&store, &regions)
        .drive(&mut sink)
        .unwrap();
    assert_eq!(report.status, SequenceStatus::Completed);
    assert_eq!(report.frames_written, 2);
    assert_eq!(report.frames_failed, 0);
    assert_eq!(report.finalize_error, None);

    let cfg = sink.config().unwrap();
    assert_eq!(cfg.frame_count, 2);
    assert_eq!(cfg.years, vec![1905, 1910]);

    let got: Vec<(u64, i32)> = sink.frames().iter().map(|(i, f)| (i.0, f.year)).collect();
    assert_eq!(got, vec![(0, 1905), (1, 1910)]);
    assert!(sink.is_finished());
}

#[test]
fn failing_frames_and_finalization_do_not_abort() {
    let store = SampleStore::from_samples([
        sample(1900, 1.0, 1.0),
        sample(1901, 1.0, 1.0),
        sample(1902, 1.0, 1.0),
    ]);
    let regions = RegionSet::synthetic_europe();
    let mut sink = FlakySink {
        reject_year: 1901,
        accepted: Vec::new(),
    };

    let report = SequenceDriver::new(&store, &regions)
        .drive(&mut sink)
        .unwrap();
    assert_eq!(report.frames_written, 2);
    assert_eq!(report.frames_failed, 1);
    assert!(report.finalize_error.unwrap().contains("GIF"));
    assert_eq!(sink.accepted, vec![1900, 1902]);
}

#[test]
fn dedicated_pool_gives_the_same_frames() {
    let store = crate::ingest::provider::demo_samples(5);
    let regions = RegionSet::synthetic_europe();

    let mut seq_sink = InMemorySink::new();
    SequenceDriver::new(&store, &regions)
        .drive(&mut seq_sink)
        .unwrap();

    let mut par_sink = InMemorySink::new();
    SequenceDriver::new(&store, &regions)
        .with_parallelism(true, Some(2))
        .drive(&mut par_sink)
        .unwrap();

    assert_eq!(seq_sink.frames(), par_sink.frames());
}

#[test]
fn zero_threads_is_rejected() {
    let store = crate::ingest::provider::demo_samples(5);
    let regions = RegionSet::synthetic_europe();
    let mut sink = InMemorySink::new();
    let err = SequenceDriver::new(&store, &regions)
        .with_parallelism(true, Some(0))
        .drive(&mut sink)
        .unwrap_err();
    assert!(err.to_string().contains("threads"));
}
