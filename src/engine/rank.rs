use std::cmp::Ordering;

use crate::engine::interp::Values;
use crate::foundation::core::CategoryId;

/// A category's place at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RankedEntry {
    /// Category.
    pub id: CategoryId,
    /// Interpolated value.
    pub value: f64,
    /// 1-based rank; 1 is the largest value.
    pub rank: usize,
    /// Whether the rank falls inside the visible window.
    pub visible: bool,
}

/// Rank every category by value, largest first, marking the top `visible` as visible.
///
/// Ties (and values that compare equal under [`f64::total_cmp`]) are broken by category id
/// ascending, so the output is a total order independent of input iteration order. Entries
/// below the window are kept so the layout can animate them out.
pub fn rank(values: &Values, visible: usize) -> Vec<RankedEntry> {
    let mut entries: Vec<(&CategoryId, f64)> = values.iter().map(|(id, &v)| (id, v)).collect();
    entries.sort_by(compare);
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (id, value))| RankedEntry {
            id: id.clone(),
            value,
            rank: i + 1,
            visible: i < visible,
        })
        .collect()
}

fn compare(a: &(&CategoryId, f64), b: &(&CategoryId, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Largest value among visible entries, or `0.0` when nothing is visible.
pub fn visible_max(ranked: &[RankedEntry]) -> f64 {
    ranked
        .iter()
        .filter(|e| e.visible)
        .map(|e| e.value)
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/rank.rs"]
mod tests;
