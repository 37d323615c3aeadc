use super::*;

fn cfg(width: u32, height: u32, frame_delay_ms: u32) -> Mp4Config {
    Mp4Config {
        width,
        height,
        frame_delay_ms,
        out_path: PathBuf::from("target/unit_encode_ffmpeg/out.mp4"),
        overwrite: true,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(cfg(0, 10, 500).validate().is_err());
    assert!(cfg(11, 10, 500).validate().is_err());
    assert!(cfg(10, 10, 0).validate().is_err());
    assert!(cfg(1500, 1000, 500).validate().is_ok());
}

#[test]
fn rate_is_frames_per_second_as_rational() {
    assert_eq!(cfg(2, 2, 500).rate(), "1000/500");
    assert_eq!(cfg(2, 2, 40).rate(), "1000/40");
}

#[test]
fn flatten_premul_over_white() {
    // Premultiplied red @ 50% alpha: 128 + (255 - 128).
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_over_white(&mut dst, &src, true).unwrap();
    assert_eq!(dst, vec![255, 127, 127, 255]);
}

#[test]
fn flatten_straight_over_white() {
    let src = vec![255u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_over_white(&mut dst, &src, false).unwrap();
    assert_eq!(dst, vec![255, 255, 255, 255]);

    let opaque = vec![10u8, 20, 30, 255];
    flatten_over_white(&mut dst, &opaque, false).unwrap();
    assert_eq!(dst, opaque);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_over_white(&mut dst, &[0u8; 4], true).is_err());
}

#[test]
fn assembling_no_frames_is_a_no_op() {
    let mut mp4 = Mp4Assembler::new("target/unit_encode_ffmpeg/empty.mp4", 500);
    mp4.assemble(&[]).unwrap();
    assert!(!mp4.out_path().exists());
}
