use super::*;
use crate::data::color::Palette;
use crate::data::dataset::Keyframe;
use crate::encode::sink::InMemorySink;
use crate::session::race_session::Frame;

fn dataset() -> Arc<Dataset> {
    let kfs = vec![
        Keyframe::new(0.0, [("A", 10.0), ("B", 5.0)]),
        Keyframe::new(1.0, [("A", 8.0), ("B", 12.0)]),
        Keyframe::new(2.0, [("A", 15.0), ("B", 3.0)]),
    ];
    Arc::new(Dataset::new(vec![], kfs, &Palette::default()).unwrap())
}

#[test]
fn export_plays_start_to_end() {
    let mut sink = InMemorySink::new();
    let stats = export_frames(
        dataset(),
        RaceConfig::default(),
        Fps::new(10, 1).unwrap(),
        &mut sink,
    )
    .unwrap();

    let frames = sink.frames();
    assert!(sink.is_ended());
    assert_eq!(stats.frames as usize, frames.len());
    assert!((21..=22).contains(&frames.len()), "{}", frames.len());
    assert_eq!(frames[0].instant, 0.0);
    assert_eq!(stats.last_instant, 2.0);
    assert_eq!(frames.last().map(|f| f.playback.state), Some(PlayState::Finished));
    assert!(frames.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert!(frames.windows(2).all(|w| w[0].instant < w[1].instant));
    assert_eq!(sink.config().map(|c| c.fps.num), Some(10));
}

#[test]
fn slow_fps_still_reaches_the_end() {
    let mut sink = InMemorySink::new();
    let stats = export_frames(
        dataset(),
        RaceConfig::default(),
        Fps::new(2, 1).unwrap(),
        &mut sink,
    )
    .unwrap();
    let instants: Vec<f64> = sink.frames().iter().map(|f| f.instant).collect();
    assert_eq!(instants, [0.0, 0.5, 1.0, 1.5, 2.0]);
    assert_eq!(stats.frames, 5);
}

#[test]
fn export_streams_into_json_lines() {
    let mut sink = crate::encode::sink::JsonLinesSink::new(Vec::new());
    let stats = export_frames(
        dataset(),
        RaceConfig::default(),
        Fps::new(2, 1).unwrap(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(sink.written(), stats.frames);

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last["instant"], 2.0);
    assert_eq!(last["playback"]["state"], "finished");
}

#[test]
fn sink_is_closed_when_a_push_fails() {
    #[derive(Default)]
    struct Failing {
        ended: bool,
    }
    impl FrameSink for Failing {
        fn begin(&mut self, _cfg: SinkConfig) -> RaceResult<()> {
            Ok(())
        }
        fn push_frame(&mut self, _frame: &Frame) -> RaceResult<()> {
            Err(RaceError::sink("nope"))
        }
        fn end(&mut self) -> RaceResult<()> {
            self.ended = true;
            Ok(())
        }
    }

    let mut sink = Failing::default();
    let err = export_frames(dataset(), RaceConfig::default(), Fps::default(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, RaceError::Sink(_)));
    assert!(sink.ended);
}

#[test]
fn invalid_config_is_rejected_before_begin() {
    let mut sink = InMemorySink::new();
    let cfg = RaceConfig {
        visible: 0,
        ..RaceConfig::default()
    };
    assert!(export_frames(dataset(), cfg, Fps::default(), &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn frame_at_lands_exactly_on_the_instant() {
    let cfg = RaceConfig {
        visible: 2,
        ..RaceConfig::default()
    };
    let f = frame_at(dataset(), cfg.clone(), 0.5).unwrap();
    assert!((f.instant - 0.5).abs() < 1e-9);
    let order: Vec<&str> = f.ranking.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(order, ["A", "B"]);
    assert!((f.bars["A"].value - 9.0).abs() < 1e-6);
    assert!((f.bars["B"].value - 8.5).abs() < 1e-6);

    let start = frame_at(dataset(), cfg.clone(), -3.0).unwrap();
    assert_eq!(start.instant, 0.0);
    assert_eq!(start.sequence, 1);

    let end = frame_at(dataset(), cfg, 99.0).unwrap();
    assert_eq!(end.instant, 2.0);
}
