use super::*;

#[test]
fn empty_object_is_all_defaults() {
    let cfg = RaceConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, RaceConfig::default());
    assert_eq!(cfg.visible, 12);
    assert_eq!(cfg.ease, Ease::InOutCubic);
    assert_eq!(cfg.axis_ease, Ease::OutCubic);
    assert_eq!(cfg.missing, MissingPolicy::Zero);
}

#[test]
fn partial_config_overrides_fields() {
    let json = r##"{
        "visible": 3,
        "canvas": {"width": 320, "height": 200},
        "ease": "linear",
        "missing": "omit",
        "fps": {"num": 30, "den": 1},
        "palette": ["#ff0000", [0, 1, 0]]
    }"##;
    let cfg = RaceConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.visible, 3);
    assert_eq!(cfg.canvas.width, 320);
    assert_eq!(cfg.ease, Ease::Linear);
    assert_eq!(cfg.missing, MissingPolicy::Omit);
    assert_eq!(cfg.palette.len(), 2);

    let opts = cfg.scheduler_opts();
    assert!((opts.frame_interval_secs - 1.0 / 30.0).abs() < 1e-12);
    assert_eq!(opts.visible, 3);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = RaceConfig::from_reader(r#"{"visibel": 3}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, RaceError::Serde(_)));
}

#[test]
fn validation_catches_bad_values() {
    let bad = [
        RaceConfig {
            visible: 0,
            ..RaceConfig::default()
        },
        RaceConfig {
            speed: 0.0,
            ..RaceConfig::default()
        },
        RaceConfig {
            units_per_second: f64::NAN,
            ..RaceConfig::default()
        },
        RaceConfig {
            bar_padding: 1.0,
            ..RaceConfig::default()
        },
        RaceConfig {
            transition_secs: -1.0,
            ..RaceConfig::default()
        },
        RaceConfig {
            fps: Fps { num: 0, den: 1 },
            ..RaceConfig::default()
        },
        RaceConfig {
            canvas: Canvas {
                width: 0,
                height: 10,
            },
            ..RaceConfig::default()
        },
    ];
    for cfg in bad {
        assert!(
            matches!(cfg.validate(), Err(RaceError::Config(_))),
            "{cfg:?}"
        );
    }
    assert!(RaceConfig::default().validate().is_ok());
}

#[test]
fn layout_uses_the_plot_rect() {
    let cfg = RaceConfig {
        canvas: Canvas {
            width: 200,
            height: 100,
        },
        margins: Margins {
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
            left: 10.0,
        },
        visible: 4,
        ..RaceConfig::default()
    };
    let layout = cfg.bar_layout();
    assert_eq!(layout.plot, Rect::new(10.0, 10.0, 190.0, 90.0));
    assert_eq!(layout.slot_height(), 20.0);
}

#[test]
fn empty_palette_falls_back_to_default() {
    assert_eq!(RaceConfig::default().palette(), Palette::default());
}
