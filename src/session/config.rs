use std::path::Path;

use serde::Deserialize;

use crate::animation::ease::Ease;
use crate::data::color::{ColorDef, Palette};
use crate::engine::interp::MissingPolicy;
use crate::engine::layout::BarLayout;
use crate::foundation::core::{Canvas, Fps, Margins, Rect};
use crate::foundation::error::{RaceError, RaceResult};
use crate::playback::scheduler::SchedulerOpts;

/// Settings for one race visualization.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaceConfig {
    /// Visible window size K.
    pub visible: usize,
    /// Output surface size.
    pub canvas: Canvas,
    /// Space around the plot area.
    pub margins: Margins,
    /// Fraction of each slot left empty between bars.
    pub bar_padding: f64,
    /// Dataset time units advanced per wall second at speed 1.
    pub units_per_second: f64,
    /// Initial speed multiplier.
    pub speed: f64,
    /// Target redraw cadence.
    pub fps: Fps,
    /// Duration of a bar's slot transition, in animation seconds.
    pub transition_secs: f64,
    /// Curve for bar slot motion.
    pub ease: Ease,
    /// Curve for the value axis maximum.
    pub axis_ease: Ease,
    /// Handling of categories missing from one keyframe of a pair.
    pub missing: MissingPolicy,
    /// Upper bound on wall time consumed by one tick.
    pub max_tick_secs: f64,
    /// Colors for categories without a declared color.
    pub palette: Vec<ColorDef>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            visible: 12,
            canvas: Canvas::default(),
            margins: Margins::default(),
            bar_padding: 0.1,
            units_per_second: 1.0,
            speed: 1.0,
            fps: Fps::default(),
            transition_secs: 0.25,
            ease: Ease::InOutCubic,
            axis_ease: Ease::OutCubic,
            missing: MissingPolicy::Zero,
            max_tick_secs: 0.25,
            palette: Vec::new(),
        }
    }
}

impl RaceConfig {
    /// Parse and validate a config from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> RaceResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| RaceError::serde(format!("race config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a config file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> RaceResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            RaceError::config(format!("open config '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> RaceResult<()> {
        if self.visible == 0 {
            return Err(RaceError::config("visible must be >= 1"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(RaceError::config("canvas width/height must be > 0"));
        }
        let m = self.margins;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(RaceError::config("margins must be finite and >= 0"));
        }
        if !(0.0..1.0).contains(&self.bar_padding) {
            return Err(RaceError::config("bar_padding must be in [0, 1)"));
        }
        positive("units_per_second", self.units_per_second)?;
        positive("speed", self.speed)?;
        positive("max_tick_secs", self.max_tick_secs)?;
        if !self.transition_secs.is_finite() || self.transition_secs < 0.0 {
            return Err(RaceError::config("transition_secs must be finite and >= 0"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }

    /// Plot area inside the margins.
    pub fn plot_rect(&self) -> Rect {
        self.canvas.inner_rect(self.margins)
    }

    /// Palette built from `palette`, or the default one when empty.
    pub fn palette(&self) -> Palette {
        Palette::new(self.palette.iter().map(|c| c.to_rgba8()).collect())
    }

    pub(crate) fn bar_layout(&self) -> BarLayout {
        BarLayout {
            plot: self.plot_rect(),
            visible: self.visible,
            padding: self.bar_padding,
            transition_secs: self.transition_secs,
            ease: self.ease,
        }
    }

    pub(crate) fn scheduler_opts(&self) -> SchedulerOpts {
        SchedulerOpts {
            units_per_second: self.units_per_second,
            speed: self.speed,
            frame_interval_secs: self.fps.frame_duration_secs(),
            max_tick_secs: self.max_tick_secs,
            visible: self.visible,
        }
    }
}

fn positive(name: &str, v: f64) -> RaceResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(RaceError::config(format!("{name} must be finite and > 0, got {v}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
