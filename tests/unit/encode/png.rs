use super::*;
use crate::foundation::core::Canvas;
use crate::ingest::store::SampleStore;
use crate::render::svg::MapLayout;

fn small_renderer() -> MapRenderer {
    MapRenderer::new(MapLayout {
        canvas: Canvas {
            width: 120,
            height: 80,
        },
        ..MapLayout::default()
    })
    .unwrap()
}

struct CountingAssembler {
    out: PathBuf,
    seen: std::sync::Arc<std::sync::Mutex<Vec<PathBuf>>>,
}

impl AnimationAssembler for CountingAssembler {
    fn out_path(&self) -> &Path {
        &self.out
    }

    fn assemble(&mut self, frames: &[PathBuf]) -> AtlasResult<()> {
        self.seen.lock().unwrap().extend_from_slice(frames);
        Ok(())
    }
}

#[test]
fn frame_names_are_zero_padded_with_year() {
    assert_eq!(frame_file_name(FrameIndex(0), 1900), "frame_000_1900.png");
    assert_eq!(frame_file_name(FrameIndex(12), 1960), "frame_012_1960.png");
}

#[test]
fn png_roundtrip_keeps_dimensions_and_pixels() {
    let path = PathBuf::from("target").join("unit_encode_png").join("px.png");
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 0, 255, 255],
        premultiplied: true,
    };
    write_png(&path, &frame).unwrap();
    let back = read_png(&path).unwrap();
    assert_eq!((back.width, back.height), (2, 1));
    assert_eq!(back.data, frame.data);
    assert!(!back.premultiplied);
}

#[test]
fn sink_writes_one_png_per_frame_and_hands_them_to_the_assembler() {
    let dir = PathBuf::from("target").join("unit_encode_png_sink");
    let _ = std::fs::remove_dir_all(&dir);

    let regions = RegionSet::synthetic_europe();
    let store = SampleStore::default();
    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut sink = PngDirSink::new(&dir, &regions, small_renderer()).with_assembler(
        CountingAssembler {
            out: dir.join("anim.gif"),
            seen: seen.clone(),
        },
    );

    let builder = crate::interp::frame::YearFrameBuilder::new();
    sink.begin(SinkConfig {
        frame_count: 2,
        years: vec![1900, 1905],
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &builder.build(1900, &regions, &store))
        .unwrap();
    sink.push_frame(FrameIndex(1), &builder.build(1905, &regions, &store))
        .unwrap();
    sink.end().unwrap();

    let expected = vec![dir.join("frame_000_1900.png"), dir.join("frame_001_1905.png")];
    assert_eq!(sink.written(), expected.as_slice());
    assert!(expected.iter().all(|p| p.is_file()));
    assert_eq!(*seen.lock().unwrap(), expected);

    let img = read_png(&expected[0]).unwrap();
    assert_eq!((img.width, img.height), (120, 80));
}

#[test]
fn assembler_is_skipped_when_nothing_was_written() {
    let dir = PathBuf::from("target").join("unit_encode_png_empty");
    let regions = RegionSet::synthetic_europe();
    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut sink = PngDirSink::new(&dir, &regions, small_renderer()).with_assembler(
        CountingAssembler {
            out: dir.join("anim.gif"),
            seen: seen.clone(),
        },
    );
    sink.begin(SinkConfig {
        frame_count: 0,
        years: vec![],
    })
    .unwrap();
    sink.end().unwrap();
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn configured_gif_assembler_runs_at_end() {
    let dir = PathBuf::from("target").join("unit_encode_png_configured");
    let _ = std::fs::remove_dir_all(&dir);

    let mut anim = crate::config::RunConfig::default().animation.unwrap();
    anim.path = dir.join("anim.gif");
    let regions = RegionSet::synthetic_europe();
    let store = SampleStore::default();
    let mut sink =
        PngDirSink::new(&dir, &regions, small_renderer()).with_assembler(anim.assembler());

    let builder = crate::interp::frame::YearFrameBuilder::new();
    sink.begin(SinkConfig {
        frame_count: 2,
        years: vec![1900, 1905],
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &builder.build(1900, &regions, &store))
        .unwrap();
    sink.push_frame(FrameIndex(1), &builder.build(1905, &regions, &store))
        .unwrap();
    sink.end().unwrap();

    assert!(dir.join("anim.gif").is_file());
}
