/// Linear interpolation `a + (b - a) * t` with no clamping of `t`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate with `t` clamped to `[0, 1]` and the result kept inside `[min(a,b), max(a,b)]`.
///
/// The second clamp absorbs floating-point rounding so callers can rely on no overshoot.
pub(crate) fn lerp_bounded(a: f64, b: f64, t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t == 0.0 {
        return a;
    }
    if t == 1.0 {
        return b;
    }
    lerp(a, b, t).clamp(a.min(b), a.max(b))
}

/// Position of `v` inside `[a, b]` as a fraction; `0.0` for an empty span.
pub(crate) fn inverse_lerp(a: f64, b: f64, v: f64) -> f64 {
    let span = b - a;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    (v - a) / span
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
