use std::time::Duration;

use crate::foundation::error::{RaceError, RaceResult};

/// Lifecycle of one visualization's playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    /// Mounted, clock not acquired yet.
    Idle,
    /// Advancing with the clock.
    Playing,
    /// Holding the current instant.
    Paused,
    /// Reached the last keyframe.
    Finished,
    /// Torn down; produces nothing ever again.
    Cancelled,
}

/// Snapshot of the playback state for host controls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackState {
    /// Displayed dataset timestamp.
    pub instant: f64,
    /// Lifecycle state.
    pub state: PlayState,
    /// Speed multiplier.
    pub speed: f64,
    /// Visible window size K.
    pub visible: usize,
}

/// Why a prepared tick was dropped instead of committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// `stop()` ran while the tick was in flight.
    Cancelled,
    /// A `seek()` moved the instant while the tick was in flight.
    Superseded,
    /// The tick would not move the displayed instant forward.
    OutOfOrder,
}

/// Result of asking the scheduler for the next tick.
#[derive(Debug, PartialEq)]
pub enum BeginTick {
    /// A tick was reserved; compute it and hand the ticket back to [`Scheduler::commit`].
    Ready(TickTicket),
    /// Nothing to draw (not started, paused without changes, finished, cancelled, or the redraw
    /// came sooner than the frame cadence).
    Idle,
    /// A previous ticket has not been committed or abandoned yet.
    Busy,
}

/// Reservation for one in-flight tick.
#[derive(Debug, PartialEq)]
pub struct TickTicket {
    id: u64,
    generation: u64,
    /// Instant this tick displays.
    pub instant: f64,
    /// Animation time since the previous tick, in seconds (wall time × speed).
    pub step_secs: f64,
    /// The tick follows a start or seek; bar motion should land immediately.
    pub snap: bool,
    /// Committing this tick ends playback.
    pub finishes: bool,
}

impl TickTicket {
    /// Seek/stop generation the ticket was issued in.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Timing parameters of a scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerOpts {
    /// Dataset time units advanced per wall second at speed 1.
    pub units_per_second: f64,
    /// Initial speed multiplier.
    pub speed: f64,
    /// Minimum wall time between ticks, in seconds.
    pub frame_interval_secs: f64,
    /// Upper bound on wall time consumed by one tick, in seconds.
    pub max_tick_secs: f64,
    /// Visible window size, reported in [`PlaybackState`].
    pub visible: usize,
}

/// Clock readings are nanosecond-truncated; a redraw this close to the cadence still counts.
const CADENCE_SLACK_SECS: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
struct ClockLease {
    last_now: Duration,
    pending_secs: f64,
}

/// Playback state machine.
///
/// Single-threaded: controls and ticks are serialized by the caller. The displayed instant only
/// changes in [`Scheduler::commit`] and [`Scheduler::seek`], so a tick in flight never observes a
/// half-applied control.
#[derive(Debug)]
pub struct Scheduler {
    opts: SchedulerOpts,
    state: PlayState,
    start: f64,
    end: f64,
    instant: f64,
    speed: f64,
    lease: Option<ClockLease>,
    generation: u64,
    next_ticket: u64,
    in_flight: Option<u64>,
    last_commit: Option<(u64, f64)>,
    dirty: bool,
}

impl Scheduler {
    /// Scheduler for the dataset time span `[start, end]`, positioned at `start`.
    pub fn new(start: f64, end: f64, opts: SchedulerOpts) -> Self {
        Self {
            opts,
            state: PlayState::Idle,
            start,
            end: end.max(start),
            instant: start,
            speed: opts.speed,
            lease: None,
            generation: 0,
            next_ticket: 0,
            in_flight: None,
            last_commit: None,
            dirty: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Displayed instant.
    pub fn instant(&self) -> f64 {
        self.instant
    }

    /// Current seek/stop generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a ticket is outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Snapshot for host controls.
    pub fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            instant: self.instant,
            state: self.state,
            speed: self.speed,
            visible: self.opts.visible,
        }
    }

    /// `Idle -> Playing`; acquires the clock at `now`.
    pub fn start(&mut self, now: Duration) -> RaceResult<()> {
        if self.state != PlayState::Idle {
            return Err(self.rejected("start"));
        }
        self.lease = Some(ClockLease {
            last_now: now,
            pending_secs: 0.0,
        });
        self.dirty = true;
        self.transition(PlayState::Playing);
        Ok(())
    }

    /// `Playing -> Paused`.
    pub fn pause(&mut self) -> RaceResult<()> {
        if self.state != PlayState::Playing {
            return Err(self.rejected("pause"));
        }
        self.transition(PlayState::Paused);
        Ok(())
    }

    /// `Paused -> Playing`, or `Finished -> Playing` after a seek moved the instant back.
    ///
    /// Time spent paused is not replayed.
    pub fn resume(&mut self, now: Duration) -> RaceResult<()> {
        let allowed = match self.state {
            PlayState::Paused => true,
            PlayState::Finished => self.instant < self.end,
            _ => false,
        };
        if !allowed {
            return Err(self.rejected("resume"));
        }
        self.lease = Some(ClockLease {
            last_now: now,
            pending_secs: 0.0,
        });
        self.transition(PlayState::Playing);
        Ok(())
    }

    /// Move the displayed instant without changing the play state.
    ///
    /// Targets outside the dataset are clamped. Any tick in flight becomes stale.
    pub fn seek(&mut self, instant: f64) -> RaceResult<()> {
        if self.state == PlayState::Cancelled {
            return Err(self.rejected("seek"));
        }
        let clamped = if instant.is_nan() {
            self.start
        } else {
            instant.clamp(self.start, self.end)
        };
        if clamped != instant {
            tracing::debug!(requested = instant, clamped, "seek target clamped");
        }
        self.instant = clamped;
        self.generation += 1;
        self.in_flight = None;
        self.dirty = true;
        if let Some(lease) = self.lease.as_mut() {
            lease.pending_secs = 0.0;
        }
        Ok(())
    }

    /// Change the speed multiplier; must be finite and positive.
    pub fn set_speed(&mut self, speed: f64) -> RaceResult<()> {
        if self.state == PlayState::Cancelled {
            return Err(self.rejected("set_speed"));
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(RaceError::playback(format!(
                "speed must be finite and > 0, got {speed}"
            )));
        }
        self.speed = speed;
        Ok(())
    }

    /// Tear down from any state. Idempotent.
    ///
    /// Releases the clock and invalidates any tick in flight.
    pub fn stop(&mut self) {
        if self.state == PlayState::Cancelled {
            return;
        }
        self.lease = None;
        self.in_flight = None;
        self.generation += 1;
        self.dirty = false;
        self.transition(PlayState::Cancelled);
    }

    /// Reserve the next tick for a redraw signal arriving at `now`.
    pub fn begin_tick(&mut self, now: Duration) -> BeginTick {
        if self.in_flight.is_some() {
            return BeginTick::Busy;
        }
        let Some(lease) = self.lease.as_mut() else {
            return BeginTick::Idle;
        };

        let elapsed = now.saturating_sub(lease.last_now).as_secs_f64();
        lease.last_now = now;

        if self.dirty {
            self.dirty = false;
            lease.pending_secs = 0.0;
            return BeginTick::Ready(self.issue(self.instant, 0.0, true, false));
        }
        if self.state != PlayState::Playing {
            return BeginTick::Idle;
        }
        if self.instant >= self.end {
            self.transition(PlayState::Finished);
            return BeginTick::Idle;
        }

        lease.pending_secs += elapsed;
        if lease.pending_secs + CADENCE_SLACK_SECS < self.opts.frame_interval_secs {
            return BeginTick::Idle;
        }
        let wall = lease.pending_secs.min(self.opts.max_tick_secs);
        lease.pending_secs = 0.0;

        let step = wall * self.speed;
        let advanced = self.instant + step * self.opts.units_per_second;
        let finishes = advanced >= self.end;
        let instant = if finishes { self.end } else { advanced };
        BeginTick::Ready(self.issue(instant, step, false, finishes))
    }

    /// Apply a computed tick if it is still current.
    ///
    /// Checked in order: cancellation, supersession by a seek, and forward progress within the
    /// generation. A discarded ticket leaves the displayed instant untouched.
    pub fn commit(&mut self, ticket: &TickTicket) -> Result<(), DiscardReason> {
        let owned = self.in_flight == Some(ticket.id);
        if owned {
            self.in_flight = None;
        }
        if self.state == PlayState::Cancelled {
            return Err(DiscardReason::Cancelled);
        }
        if !owned || ticket.generation != self.generation {
            return Err(DiscardReason::Superseded);
        }
        if let Some((generation, last)) = self.last_commit {
            if generation == ticket.generation && ticket.instant <= last {
                return Err(DiscardReason::OutOfOrder);
            }
        }

        self.instant = ticket.instant;
        self.last_commit = Some((ticket.generation, ticket.instant));
        if ticket.finishes && self.state == PlayState::Playing {
            self.transition(PlayState::Finished);
        }
        Ok(())
    }

    /// Release a ticket whose computation failed, without applying it.
    pub fn abandon(&mut self, ticket: &TickTicket) {
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
        }
    }

    fn issue(&mut self, instant: f64, step_secs: f64, snap: bool, finishes: bool) -> TickTicket {
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(id);
        TickTicket {
            id,
            generation: self.generation,
            instant,
            step_secs,
            snap,
            finishes,
        }
    }

    fn transition(&mut self, to: PlayState) {
        tracing::debug!(from = ?self.state, to = ?to, instant = self.instant, "playback transition");
        self.state = to;
    }

    fn rejected(&self, op: &str) -> RaceError {
        RaceError::playback(format!("{op} is not valid while {:?}", self.state))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
