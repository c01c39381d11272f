use crate::foundation::math::lerp;

/// Easing curve applied to normalized transition progress.
///
/// Every curve maps `0 -> 0` and `1 -> 1` and is monotonic in between, so eased bar motion never
/// leaves the segment between its start and target slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// No easing.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    #[default]
    InOutCubic,
}

impl Ease {
    /// Map progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t.powi(2),
            Self::OutQuad => mirror(t, 2),
            Self::InOutQuad => symmetric(t, 2),
            Self::InCubic => t.powi(3),
            Self::OutCubic => mirror(t, 3),
            Self::InOutCubic => symmetric(t, 3),
        }
    }

    /// Eased value between `from` and `to` at progress `t`.
    pub fn between(self, from: f64, to: f64, t: f64) -> f64 {
        let t = self.apply(t);
        if t >= 1.0 {
            return to;
        }
        lerp(from, to, t)
    }
}

/// Ease-out of power `p`: the ease-in curve reflected through the center.
fn mirror(t: f64, p: i32) -> f64 {
    1.0 - (1.0 - t).powi(p)
}

/// Ease-in for the first half, ease-out for the second.
fn symmetric(t: f64, p: i32) -> f64 {
    let half = 2f64.powi(p - 1);
    if t < 0.5 {
        half * t.powi(p)
    } else {
        1.0 - half * (1.0 - t).powi(p)
    }
}

/// Progress of a fixed-length transition after `elapsed` seconds.
///
/// Zero or negative durations complete immediately.
pub(crate) fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 || !duration.is_finite() {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
