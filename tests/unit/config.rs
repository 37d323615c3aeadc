use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = RunConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, RunConfig::default());
    assert_eq!(cfg.out_dir, PathBuf::from("animation_frames"));
    assert_eq!((cfg.canvas.width, cfg.canvas.height), (1500, 1000));
    assert_eq!(cfg.title, "Color Usage in European Paintings (1900-2000)");
    let anim = cfg.animation.as_ref().unwrap();
    assert_eq!(anim.format, AnimationFormat::Gif);
    assert_eq!(anim.path, PathBuf::from("color_usage_animation.gif"));
    assert_eq!(anim.frame_delay_ms, 500);
    assert!(cfg.validate().is_ok());
}

#[test]
fn null_animation_disables_assembly() {
    let cfg = RunConfig::from_reader(r#"{"animation": null}"#.as_bytes()).unwrap();
    assert!(cfg.animation.is_none());
}

#[test]
fn partial_sections_keep_their_other_defaults() {
    let cfg = RunConfig::from_reader(
        r#"{"extent": {"lon_min": -10.0}, "animation": {"format": "mp4", "path": "out.mp4"}}"#
            .as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.extent.lon_min, -10.0);
    assert_eq!(cfg.extent.lon_max, 40.0);
    let anim = cfg.animation.unwrap();
    assert_eq!(anim.format, AnimationFormat::Mp4);
    assert_eq!(anim.frame_delay_ms, 500);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = RunConfig::from_reader(r#"{"colour": 1}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("colour"));
}

#[test]
fn validation_rejects_unusable_settings() {
    let zero_canvas = RunConfig {
        canvas: Canvas {
            width: 0,
            height: 10,
        },
        ..RunConfig::default()
    };
    assert!(zero_canvas.validate().is_err());

    let no_source = RunConfig {
        samples: None,
        demo_fallback: false,
        ..RunConfig::default()
    };
    assert!(no_source.validate().is_err());

    let zero_threads = RunConfig {
        threads: Some(0),
        ..RunConfig::default()
    };
    assert!(zero_threads.validate().is_err());

    let odd_mp4 = RunConfig {
        canvas: Canvas {
            width: 1501,
            height: 1000,
        },
        animation: Some(AnimationConfig {
            format: AnimationFormat::Mp4,
            ..AnimationConfig::default()
        }),
        ..RunConfig::default()
    };
    assert!(odd_mp4.validate().is_err());

    let odd_gif = RunConfig {
        canvas: Canvas {
            width: 1501,
            height: 1000,
        },
        ..RunConfig::default()
    };
    assert!(odd_gif.validate().is_ok());
}

#[test]
fn provider_cascades_follow_the_config() {
    let cfg = RunConfig {
        samples: Some(PathBuf::from("paintings.csv")),
        demo_seed: 9,
        region_sources: vec![PathBuf::from("a.geojson")],
        ..RunConfig::default()
    };
    assert_eq!(
        cfg.sample_providers(),
        vec![
            SampleProvider::CsvFile(PathBuf::from("paintings.csv")),
            SampleProvider::Demo { seed: 9 },
        ]
    );
    assert_eq!(
        cfg.region_providers(),
        vec![
            RegionProvider::GeoJsonFile(PathBuf::from("a.geojson")),
            RegionProvider::Synthetic,
        ]
    );

    let strict = RunConfig {
        demo_fallback: false,
        ..cfg
    };
    assert_eq!(strict.sample_providers().len(), 1);
}

#[test]
fn assembler_matches_format() {
    let gif = AnimationConfig::default().assembler();
    assert_eq!(gif.out_path(), Path::new("color_usage_animation.gif"));

    let mp4 = AnimationConfig {
        format: AnimationFormat::Mp4,
        path: PathBuf::from("out/anim.mp4"),
        frame_delay_ms: 250,
    }
    .assembler();
    assert_eq!(mp4.out_path(), Path::new("out/anim.mp4"));
}

#[test]
fn config_file_is_read_from_disk() {
    let dir = PathBuf::from("target").join("unit_config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("run.json");
    std::fs::write(&path, r#"{"parallel": true, "threads": 2}"#).unwrap();
    let cfg = RunConfig::from_path(&path).unwrap();
    assert!(cfg.parallel);
    assert_eq!(cfg.threads, Some(2));

    assert!(RunConfig::from_path(dir.join("missing.json")).is_err());
}
