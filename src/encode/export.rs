use std::sync::Arc;

use crate::data::dataset::Dataset;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{RaceError, RaceResult};
use crate::playback::clock::ManualClock;
use crate::playback::scheduler::PlayState;
use crate::session::config::RaceConfig;
use crate::session::race_session::{Frame, RaceSession, TickOutcome};

/// Counters reported by [`export_frames`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExportStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Ticks that failed to compute.
    pub skipped: u64,
    /// Instant of the last pushed frame.
    pub last_instant: f64,
}

/// Play the whole dataset at `fps` on a fixed-step clock and push every frame into `sink`.
///
/// `sink.end()` runs even when playback fails part way.
#[tracing::instrument(skip_all, fields(fps = fps.as_f64()))]
pub fn export_frames(
    dataset: Arc<Dataset>,
    mut config: RaceConfig,
    fps: Fps,
    sink: &mut dyn FrameSink,
) -> RaceResult<ExportStats> {
    let fps = Fps::new(fps.num, fps.den)?;
    let step = fps.frame_duration_secs();
    config.fps = fps;
    config.max_tick_secs = config.max_tick_secs.max(step);
    config.validate()?;

    let span = dataset.end_time() - dataset.start_time();
    let budget = (span / (config.units_per_second * config.speed) / step).ceil() as u64 + 4;

    let clock = ManualClock::new();
    let mut session = RaceSession::new(dataset, config, Box::new(clock.clone()))?;
    sink.begin(SinkConfig {
        canvas: session.config().canvas,
        fps,
    })?;

    let played = play(&mut session, &clock, step, budget, sink);
    let ended = sink.end();
    let stats = played?;
    ended?;
    tracing::debug!(frames = stats.frames, skipped = stats.skipped, "export finished");
    Ok(stats)
}

fn play(
    session: &mut RaceSession,
    clock: &ManualClock,
    step: f64,
    budget: u64,
    sink: &mut dyn FrameSink,
) -> RaceResult<ExportStats> {
    let mut stats = ExportStats::default();
    session.start()?;
    for _ in 0..budget {
        match session.on_redraw() {
            TickOutcome::Committed(frame) => {
                sink.push_frame(&frame)?;
                stats.frames += 1;
                stats.last_instant = frame.instant;
            }
            TickOutcome::Skipped(_) => stats.skipped += 1,
            TickOutcome::Idle if session.playback().state == PlayState::Finished => {
                return Ok(stats);
            }
            TickOutcome::Idle | TickOutcome::Busy | TickOutcome::Discarded(_) => {}
        }
        clock.advance_secs(step);
    }
    Err(RaceError::playback(format!(
        "export did not finish within {budget} ticks"
    )))
}

/// The frame displayed at `instant` after playing from the start at the configured fps.
///
/// Unlike a seek, bars arrive with the motion they would have during live playback. The last
/// tick is shortened by lowering the speed so playback lands exactly on `instant`.
#[tracing::instrument(skip(dataset, config))]
pub fn frame_at(dataset: Arc<Dataset>, mut config: RaceConfig, instant: f64) -> RaceResult<Frame> {
    config.validate()?;
    let target = dataset.clamp_time(instant);
    let step = config.fps.frame_duration_secs();
    config.max_tick_secs = config.max_tick_secs.max(step);
    let ups = config.units_per_second;
    let span = target - dataset.start_time();
    let budget = (span / (ups * config.speed) / step).ceil() as u64 + 8;

    let clock = ManualClock::new();
    let mut session = RaceSession::new(dataset, config, Box::new(clock.clone()))?;
    session.start()?;
    let mut last = None;
    for _ in 0..budget {
        match session.on_redraw() {
            TickOutcome::Committed(frame) => last = Some(*frame),
            TickOutcome::Skipped(reason) => return Err(RaceError::playback(reason)),
            TickOutcome::Idle | TickOutcome::Busy | TickOutcome::Discarded(_) => {}
        }
        let playback = session.playback();
        let remaining = target - playback.instant;
        if remaining <= 1e-9 * target.abs().max(1.0) || playback.state == PlayState::Finished {
            return last.ok_or_else(|| RaceError::playback("no frame was committed"));
        }
        if remaining < step * playback.speed * ups {
            session.set_speed(remaining / (step * ups))?;
        }
        clock.advance_secs(step);
    }
    Err(RaceError::playback(format!(
        "did not reach {target} within {budget} ticks"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
