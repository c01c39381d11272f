use std::collections::BTreeMap;

use crate::data::dataset::{Dataset, Keyframe};
use crate::foundation::core::CategoryId;
use crate::foundation::math::lerp_bounded;

/// Interpolated value per category at one instant.
pub type Values = BTreeMap<CategoryId, f64>;

/// What a category absent from one side of a keyframe pair contributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// The missing side counts as `0`; the category is still ranked.
    #[default]
    Zero,
    /// The category is left out of the instant's values.
    Omit,
}

/// Interpolate between two keyframes with the default [`MissingPolicy::Zero`].
pub fn interpolate(prev: &Keyframe, next: &Keyframe, t: f64) -> Values {
    interpolate_with(prev, next, t, MissingPolicy::Zero)
}

/// Interpolate every category present in either keyframe at progress `t`.
///
/// `t` is clamped to `[0, 1]`. Results stay inside `[min(a, b), max(a, b)]` of the two endpoint
/// values, and `t == 0` / `t == 1` return the endpoint values bit-for-bit.
pub fn interpolate_with(prev: &Keyframe, next: &Keyframe, t: f64, policy: MissingPolicy) -> Values {
    let mut out = Values::new();
    for (id, &a) in &prev.values {
        match (next.values.get(id), policy) {
            (Some(&b), _) => {
                out.insert(id.clone(), lerp_bounded(a, b, t));
            }
            (None, MissingPolicy::Zero) => {
                out.insert(id.clone(), lerp_bounded(a, 0.0, t));
            }
            (None, MissingPolicy::Omit) => {}
        }
    }
    if policy == MissingPolicy::Zero {
        for (id, &b) in &next.values {
            if !prev.values.contains_key(id) {
                out.insert(id.clone(), lerp_bounded(0.0, b, t));
            }
        }
    }
    out
}

/// Interpolated values at a dataset instant, with the keyframe pair it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Index of the keyframe at or before the instant.
    pub prev: usize,
    /// Index of the keyframe after the instant (equal to `prev` for static datasets).
    pub next: usize,
    /// Progress inside the pair, `0..=1`.
    pub t: f64,
    /// Interpolated values.
    pub values: Values,
}

/// Sample `dataset` at `instant` (clamped into the dataset's time span).
pub fn sample(dataset: &Dataset, instant: f64, policy: MissingPolicy) -> Sample {
    let (prev, next, t) = dataset.locate(instant);
    let keys = dataset.keyframes();
    let values = match policy {
        _ if prev == next => keys[prev].values.clone(),
        // Omit keeps every category of the keyframe the instant sits on.
        MissingPolicy::Omit if t <= 0.0 => keys[prev].values.clone(),
        MissingPolicy::Omit if t >= 1.0 => keys[next].values.clone(),
        _ => interpolate_with(&keys[prev], &keys[next], t, policy),
    };
    Sample {
        prev,
        next,
        t,
        values,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/interp.rs"]
mod tests;
