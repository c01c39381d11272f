use std::sync::Arc;

use crate::data::dataset::Dataset;
use crate::engine::interp::sample;
use crate::engine::layout::{BarLayout, Layout};
use crate::engine::rank::{RankedEntry, rank, visible_max};
use crate::engine::scale::{AxisTracker, LinearScale};
use crate::foundation::core::Rect;
use crate::foundation::error::{RaceError, RaceResult};
use crate::playback::clock::Clock;
use crate::playback::scheduler::{
    BeginTick, DiscardReason, PlayState, PlaybackState, Scheduler, TickTicket,
};
use crate::session::config::RaceConfig;

const AXIS_TICKS: usize = 5;

/// Everything a renderer needs to draw one committed tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Frame {
    /// 1-based count of frames committed by the session.
    pub sequence: u64,
    /// Displayed dataset timestamp.
    pub instant: f64,
    /// Seek/stop generation the frame belongs to.
    pub generation: u64,
    /// Index of the keyframe at or before `instant`.
    pub prev: usize,
    /// Index of the keyframe after `instant` (equal to `prev` at the ends).
    pub next: usize,
    /// Progress between `prev` and `next`.
    pub t: f64,
    /// Playback state right after the commit.
    pub playback: PlaybackState,
    /// Full ranking, visible entries first.
    pub ranking: Vec<RankedEntry>,
    /// Bars to draw, including entering and exiting ones.
    pub bars: Layout,
    /// Value axis.
    pub axis: AxisFrame,
}

/// Value axis of a frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AxisFrame {
    /// Value mapped to the right edge of the plot.
    pub max: f64,
    /// Plot area.
    pub plot: Rect,
    /// Gridline positions.
    pub ticks: Vec<AxisTick>,
}

/// One axis gridline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AxisTick {
    /// Domain value.
    pub value: f64,
    /// Pixel x coordinate.
    pub x: f64,
}

/// What a redraw produced.
#[derive(Debug, PartialEq)]
pub enum TickOutcome {
    /// A new frame was committed.
    Committed(Box<Frame>),
    /// Nothing to draw.
    Idle,
    /// A tick is already in flight.
    Busy,
    /// The tick went stale before it could be committed.
    Discarded(DiscardReason),
    /// The tick failed to compute and was dropped.
    Skipped(String),
}

impl TickOutcome {
    /// The committed frame, if any.
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Self::Committed(frame) => Some(frame),
            _ => None,
        }
    }
}

/// A computed tick waiting to be committed.
#[derive(Debug)]
pub struct PendingFrame {
    ticket: TickTicket,
    frame: Frame,
    axis: AxisTracker,
}

impl PendingFrame {
    /// The frame as it will be committed.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

/// Result of [`RaceSession::prepare_tick`].
#[derive(Debug)]
pub enum Prepared {
    /// Hand this back to [`RaceSession::commit_tick`].
    Pending(Box<PendingFrame>),
    /// The redraw ended without a tick to commit.
    Done(TickOutcome),
}

/// One mounted race visualization.
///
/// Owns the playback state and the previous tick's layout; the dataset is shared. Ticks are
/// computed against a snapshot and only become visible through [`RaceSession::commit_tick`], so
/// controls called between prepare and commit win over the pending tick.
pub struct RaceSession {
    dataset: Arc<Dataset>,
    config: RaceConfig,
    clock: Box<dyn Clock>,
    scheduler: Scheduler,
    bar_layout: BarLayout,
    axis: AxisTracker,
    bars: Layout,
    sequence: u64,
}

impl RaceSession {
    /// Mount a session in the `Idle` state.
    #[tracing::instrument(
        skip_all,
        fields(keyframes = dataset.keyframes().len(), visible = config.visible)
    )]
    pub fn new(
        dataset: Arc<Dataset>,
        config: RaceConfig,
        clock: Box<dyn Clock>,
    ) -> RaceResult<Self> {
        config.validate()?;
        let scheduler = Scheduler::new(
            dataset.start_time(),
            dataset.end_time(),
            config.scheduler_opts(),
        );
        tracing::debug!(
            start = dataset.start_time(),
            end = dataset.end_time(),
            "race session mounted"
        );
        Ok(Self {
            bar_layout: config.bar_layout(),
            axis: AxisTracker::new(0.0, config.axis_ease),
            dataset,
            config,
            clock,
            scheduler,
            bars: Layout::new(),
            sequence: 0,
        })
    }

    /// Shared dataset.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Active configuration.
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Playback snapshot for host controls.
    pub fn playback(&self) -> PlaybackState {
        self.scheduler.snapshot()
    }

    /// Bars of the last committed frame.
    pub fn bars(&self) -> &Layout {
        &self.bars
    }

    /// Begin playing from the current instant.
    pub fn start(&mut self) -> RaceResult<()> {
        let now = self.clock.now();
        self.scheduler.start(now)
    }

    /// Hold the current instant.
    pub fn pause(&mut self) -> RaceResult<()> {
        self.scheduler.pause()
    }

    /// Continue after a pause (or after seeking back from the end).
    pub fn resume(&mut self) -> RaceResult<()> {
        let now = self.clock.now();
        self.scheduler.resume(now)
    }

    /// Jump to `instant`; the next frame lands there without transition.
    pub fn seek(&mut self, instant: f64) -> RaceResult<()> {
        self.scheduler.seek(instant)
    }

    /// Change the speed multiplier.
    pub fn set_speed(&mut self, speed: f64) -> RaceResult<()> {
        self.scheduler.set_speed(speed)
    }

    /// Tear the session down. Idempotent; nothing is produced afterwards.
    pub fn stop(&mut self) {
        if self.scheduler.state() != PlayState::Cancelled {
            self.scheduler.stop();
            self.bars.clear();
        }
    }

    /// Handle a host redraw signal: prepare and commit in one go.
    pub fn on_redraw(&mut self) -> TickOutcome {
        match self.prepare_tick() {
            Prepared::Pending(pending) => self.commit_tick(*pending),
            Prepared::Done(outcome) => outcome,
        }
    }

    /// Reserve and compute the next tick without applying it.
    pub fn prepare_tick(&mut self) -> Prepared {
        let now = self.clock.now();
        let ticket = match self.scheduler.begin_tick(now) {
            BeginTick::Ready(ticket) => ticket,
            BeginTick::Idle => return Prepared::Done(TickOutcome::Idle),
            BeginTick::Busy => return Prepared::Done(TickOutcome::Busy),
        };
        match self.compute(&ticket) {
            Ok((frame, axis)) => Prepared::Pending(Box::new(PendingFrame {
                ticket,
                frame,
                axis,
            })),
            Err(err) => {
                tracing::warn!(instant = ticket.instant, error = %err, "tick skipped");
                self.scheduler.abandon(&ticket);
                Prepared::Done(TickOutcome::Skipped(err.to_string()))
            }
        }
    }

    /// Apply a prepared tick if it is still current.
    pub fn commit_tick(&mut self, pending: PendingFrame) -> TickOutcome {
        let PendingFrame {
            ticket,
            mut frame,
            axis,
        } = pending;
        if let Err(reason) = self.scheduler.commit(&ticket) {
            tracing::debug!(?reason, instant = ticket.instant, "stale tick discarded");
            return TickOutcome::Discarded(reason);
        }
        self.sequence += 1;
        frame.sequence = self.sequence;
        frame.playback = self.scheduler.snapshot();
        self.bars = frame.bars.clone();
        self.axis = axis;
        TickOutcome::Committed(Box::new(frame))
    }

    fn compute(&self, ticket: &TickTicket) -> RaceResult<(Frame, AxisTracker)> {
        let s = sample(&self.dataset, ticket.instant, self.config.missing);
        if let Some((id, v)) = s.values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RaceError::invalid_dataset(format!(
                "non-finite value {v} for '{id}' at {}",
                ticket.instant
            )));
        }
        let ranking = rank(&s.values, self.config.visible);
        let shown = visible_max(&ranking);

        let mut axis = self.axis.clone();
        if ticket.snap {
            axis.reset(shown);
        }
        let next_values = &self.dataset.keyframes()[s.next].values;
        let eased = axis.observe(s.prev, s.t, || {
            let upcoming = rank(next_values, self.config.visible);
            visible_max(&upcoming).max(shown)
        });
        // Never let a bar run past the axis while the max is still easing up.
        let max = eased.max(shown);

        let plot = self.bar_layout.plot;
        let scale = LinearScale::new((0.0, max), (plot.x0, plot.x1));
        let step = if ticket.snap {
            self.bar_layout.transition_secs
        } else {
            ticket.step_secs
        };
        let bars = self
            .bar_layout
            .layout(&ranking, &self.bars, &scale, &self.dataset, step);

        let (lo, hi) = scale.domain();
        let ticks = scale
            .ticks(AXIS_TICKS)
            .into_iter()
            .filter(|v| (lo..=hi).contains(v))
            .map(|value| AxisTick {
                value,
                x: scale.map(value),
            })
            .collect();

        let frame = Frame {
            sequence: 0,
            instant: ticket.instant,
            generation: ticket.generation(),
            prev: s.prev,
            next: s.next,
            t: s.t,
            playback: self.scheduler.snapshot(),
            ranking,
            bars,
            axis: AxisFrame {
                max: hi,
                plot,
                ticks,
            },
        };
        Ok((frame, axis))
    }
}

impl Drop for RaceSession {
    fn drop(&mut self) {
        self.stop();
    }
}
