//! barrace is an animated ranked bar chart ("bar chart race") engine.
//!
//! Given a time-indexed table of category values, it computes for every displayed instant the
//! interpolated value, rank and eased bar position of each category, including categories that
//! enter or leave the visible top-K window. The public API is session-oriented:
//!
//! - Load and validate a [`Dataset`]
//! - Mount a [`RaceSession`] with a [`RaceConfig`] and a [`Clock`]
//! - Call [`RaceSession::on_redraw`] from the host's redraw loop, or stream a whole run into a
//!   [`FrameSink`] with [`export_frames`]
//!
//! The pure stages ([`interpolate`], [`rank`], [`BarLayout::layout`], [`LinearScale`]) are exported
//! as well for hosts that drive their own loop.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod data;
pub(crate) mod engine;
pub(crate) mod playback;
/// Frame sinks and offline export.
pub(crate) mod encode;
/// CPU rasterization of committed frames.
pub(crate) mod render;
pub(crate) mod session;

pub mod chart;

pub use crate::foundation::core::{
    BezPath, Canvas, CategoryId, Fps, Margins, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{RaceError, RaceResult};

pub use crate::animation::ease::Ease;
pub use crate::chart::{Chart, Mark};
pub use crate::data::color::{ColorDef, Palette};
pub use crate::data::dataset::{Category, CategoryDecl, Dataset, Keyframe};
pub use crate::encode::export::{ExportStats, export_frames, frame_at};
pub use crate::encode::sink::{FrameSink, InMemorySink, JsonLinesSink, SinkConfig};
pub use crate::engine::interp::{
    MissingPolicy, Sample, Values, interpolate, interpolate_with, sample,
};
pub use crate::engine::layout::{BarLayout, BarPhase, BarState, Layout};
pub use crate::engine::rank::{RankedEntry, rank, visible_max};
pub use crate::engine::scale::{AxisTracker, LinearScale, scale_time, scale_value};
pub use crate::playback::clock::{Clock, ManualClock, SystemClock};
pub use crate::playback::scheduler::{
    BeginTick, DiscardReason, PlayState, PlaybackState, Scheduler, SchedulerOpts, TickTicket,
};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::{RasterOpts, rasterize, rasterize_all};
pub use crate::session::config::RaceConfig;
pub use crate::session::race_session::{
    AxisFrame, AxisTick, Frame, PendingFrame, Prepared, RaceSession, TickOutcome,
};
