use crate::animation::ease::Ease;
use crate::foundation::math::{inverse_lerp, lerp};

/// Continuous linear mapping from a data domain to a pixel range.
///
/// A zero-width or non-finite domain is replaced by a unit span starting at the domain's lower
/// bound, so mapping never divides by zero.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Build a scale, repairing degenerate domains.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain: repair_domain(domain),
            range,
        }
    }

    /// Effective domain after repair.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Pixel range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to pixels. Values outside the domain extrapolate linearly.
    pub fn map(&self, v: f64) -> f64 {
        let t = inverse_lerp(self.domain.0, self.domain.1, v);
        lerp(self.range.0, self.range.1, t)
    }

    /// Map a pixel coordinate back to the domain.
    pub fn invert(&self, px: f64) -> f64 {
        let t = inverse_lerp(self.range.0, self.range.1, px);
        lerp(self.domain.0, self.domain.1, t)
    }

    /// Round tick values covering the domain, roughly `count` of them, on 1/2/5 × 10^k steps.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut lo, mut hi) = self.domain;
        let reversed = hi < lo;
        if reversed {
            std::mem::swap(&mut lo, &mut hi);
        }
        let Some(step) = tick_step(lo, hi, count) else {
            return vec![lo];
        };

        let mut out = Vec::new();
        match step {
            TickStep::Multiply(inc) => {
                let i0 = (lo / inc).ceil() as i64;
                let i1 = (hi / inc).floor() as i64;
                out.extend((i0..=i1).map(|i| i as f64 * inc));
            }
            TickStep::Divide(inv) => {
                let i0 = (lo * inv).ceil() as i64;
                let i1 = (hi * inv).floor() as i64;
                out.extend((i0..=i1).map(|i| i as f64 / inv));
            }
        }
        if reversed {
            out.reverse();
        }
        out
    }
}

/// Map `value` from `domain` into `range`.
pub fn scale_value(value: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    LinearScale::new(domain, range).map(value)
}

/// Map a dataset timestamp from a time `domain` into `range`.
pub fn scale_time(timestamp: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    LinearScale::new(domain, range).map(timestamp)
}

fn repair_domain(domain: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = domain;
    if lo.is_finite() && hi.is_finite() && lo != hi {
        return domain;
    }
    let base = if lo.is_finite() { lo } else { 0.0 };
    tracing::debug!(lo, hi, "degenerate scale domain, using unit span");
    (base, base + 1.0)
}

enum TickStep {
    Multiply(f64),
    Divide(f64),
}

fn tick_step(lo: f64, hi: f64, count: usize) -> Option<TickStep> {
    if count == 0 || hi <= lo {
        return None;
    }
    let raw = (hi - lo) / count as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    // Negative powers divide by an integer to keep ticks like 0.1, 0.2 exact.
    if power >= 0.0 {
        Some(TickStep::Multiply(factor * 10f64.powf(power)))
    } else {
        Some(TickStep::Divide(10f64.powf(-power) / factor))
    }
}

/// Value-axis maximum that is retargeted once per keyframe pair and eased in between.
///
/// Retargeting only happens when the displayed pair changes, so the axis does not jitter as
/// intermediate values cross each other.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTracker {
    ease: Ease,
    pair: Option<usize>,
    from: f64,
    to: f64,
    current: f64,
}

impl AxisTracker {
    /// Tracker starting at `initial_max`.
    pub fn new(initial_max: f64, ease: Ease) -> Self {
        Self {
            ease,
            pair: None,
            from: initial_max,
            to: initial_max,
            current: initial_max,
        }
    }

    /// Eased maximum at progress `t` inside keyframe pair `pair`.
    ///
    /// `target` is evaluated only when `pair` differs from the previously observed pair.
    pub fn observe(&mut self, pair: usize, t: f64, target: impl FnOnce() -> f64) -> f64 {
        if self.pair != Some(pair) {
            let next = target();
            let next = if next.is_finite() { next } else { self.current };
            tracing::debug!(pair, from = self.current, to = next, "axis retarget");
            self.from = self.current;
            self.to = next;
            self.pair = Some(pair);
        }
        self.current = self.ease.between(self.from, self.to, t);
        self.current
    }

    /// Last observed maximum.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Forget the tracked pair so the next observation retargets.
    pub fn reset(&mut self, max: f64) {
        self.pair = None;
        self.from = max;
        self.to = max;
        self.current = max;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scale.rs"]
mod tests;
