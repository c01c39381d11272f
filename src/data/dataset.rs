use std::collections::{BTreeMap, BTreeSet};

use crate::data::color::{ColorDef, Palette};
use crate::foundation::core::{CategoryId, Rgba8};
use crate::foundation::error::{RaceError, RaceResult};

/// One racing category: stable id, display label and its fixed color.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Category {
    /// Stable identifier.
    pub id: CategoryId,
    /// Label drawn next to the bar.
    pub label: String,
    /// Color for the whole run; never derived from rank.
    pub color: Rgba8,
}

/// Category declaration before colors are resolved.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct CategoryDecl {
    /// Stable identifier.
    pub id: CategoryId,
    /// Display label; defaults to the id.
    #[serde(default)]
    pub label: Option<String>,
    /// Explicit color; defaults to a palette pick.
    #[serde(default)]
    pub color: Option<ColorDef>,
}

impl CategoryDecl {
    /// Declaration with only an id.
    pub fn new(id: impl Into<CategoryId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            color: None,
        }
    }
}

/// Snapshot of every category's value at one timestamp.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Dataset timestamp (any monotonic unit: seconds, years, ...).
    pub time: f64,
    /// Category values at `time`. Absent categories follow the missing-value policy.
    pub values: BTreeMap<CategoryId, f64>,
}

impl Keyframe {
    /// Build a keyframe from `(id, value)` pairs.
    pub fn new<I, K>(time: f64, values: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<CategoryId>,
    {
        Self {
            time,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Validated, immutable time-indexed table of category values.
///
/// Invariants established by [`Dataset::new`]:
/// - at least one keyframe,
/// - timestamps finite and strictly increasing,
/// - every value finite,
/// - every category referenced by a keyframe is declared exactly once.
#[derive(Clone, Debug)]
pub struct Dataset {
    categories: Vec<Category>,
    by_id: BTreeMap<CategoryId, usize>,
    keyframes: Vec<Keyframe>,
}

impl Dataset {
    /// Validate keyframes and resolve category labels and colors.
    ///
    /// Categories that appear in keyframes but not in `decls` are declared implicitly, in
    /// id order, with their id as label.
    pub fn new(
        decls: Vec<CategoryDecl>,
        keyframes: Vec<Keyframe>,
        palette: &Palette,
    ) -> RaceResult<Self> {
        if keyframes.is_empty() {
            return Err(RaceError::invalid_dataset("dataset needs at least one keyframe"));
        }
        for (i, kf) in keyframes.iter().enumerate() {
            if !kf.time.is_finite() {
                return Err(RaceError::invalid_dataset(format!(
                    "keyframe {i} has a non-finite timestamp"
                )));
            }
            if let Some((id, v)) = kf.values.iter().find(|(_, v)| !v.is_finite()) {
                return Err(RaceError::invalid_dataset(format!(
                    "keyframe {i} has non-finite value {v} for '{id}'"
                )));
            }
            if kf.values.keys().any(|id| id.as_str().is_empty()) {
                return Err(RaceError::invalid_dataset(format!(
                    "keyframe {i} has an empty category id"
                )));
            }
        }
        if let Some(w) = keyframes.windows(2).position(|w| w[0].time >= w[1].time) {
            return Err(RaceError::invalid_dataset(format!(
                "keyframe timestamps must be strictly increasing (keyframe {} at {} is not after {})",
                w + 1,
                keyframes[w + 1].time,
                keyframes[w].time
            )));
        }

        let mut categories = Vec::new();
        let mut by_id = BTreeMap::new();
        for decl in decls {
            if decl.id.as_str().is_empty() {
                return Err(RaceError::invalid_dataset("category id must be non-empty"));
            }
            if by_id.contains_key(&decl.id) {
                return Err(RaceError::invalid_dataset(format!(
                    "category '{}' declared twice",
                    decl.id
                )));
            }
            let color = match decl.color {
                Some(c) => c.to_rgba8(),
                None => palette.pick(decl.id.as_str()),
            };
            let label = decl.label.unwrap_or_else(|| decl.id.to_string());
            by_id.insert(decl.id.clone(), categories.len());
            categories.push(Category {
                id: decl.id,
                label,
                color,
            });
        }

        let implicit: BTreeSet<&CategoryId> = keyframes
            .iter()
            .flat_map(|kf| kf.values.keys())
            .filter(|id| !by_id.contains_key(*id))
            .collect();
        for id in implicit {
            by_id.insert(id.clone(), categories.len());
            categories.push(Category {
                id: id.clone(),
                label: id.to_string(),
                color: palette.pick(id.as_str()),
            });
        }

        Ok(Self {
            categories,
            by_id,
            keyframes,
        })
    }

    /// Keyframes in timestamp order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.by_id.get(id).map(|&i| &self.categories[i])
    }

    /// Timestamp of the first keyframe.
    pub fn start_time(&self) -> f64 {
        self.keyframes[0].time
    }

    /// Timestamp of the last keyframe.
    pub fn end_time(&self) -> f64 {
        self.keyframes[self.keyframes.len() - 1].time
    }

    /// Clamp `time` into `[start_time, end_time]`; NaN maps to the start.
    pub fn clamp_time(&self, time: f64) -> f64 {
        if time.is_nan() {
            return self.start_time();
        }
        time.clamp(self.start_time(), self.end_time())
    }

    /// Keyframe pair bracketing `time` and the fractional position inside it.
    ///
    /// `time` is clamped first. An instant equal to a keyframe's timestamp returns that keyframe
    /// as `prev` with `t == 0`, except for the last keyframe, which returns the final pair with
    /// `t == 1`. Single-keyframe datasets return `(0, 0, 0.0)`.
    pub fn locate(&self, time: f64) -> (usize, usize, f64) {
        let n = self.keyframes.len();
        if n == 1 {
            return (0, 0, 0.0);
        }
        let time = self.clamp_time(time);
        let idx = self.keyframes.partition_point(|k| k.time <= time);
        if idx >= n {
            return (n - 2, n - 1, 1.0);
        }
        let prev = idx.saturating_sub(1);
        let a = self.keyframes[prev].time;
        let b = self.keyframes[idx].time;
        let t = ((time - a) / (b - a)).clamp(0.0, 1.0);
        (prev, idx, t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/dataset.rs"]
mod tests;
