use std::collections::{BTreeMap, BTreeSet};

use crate::animation::ease::{Ease, progress};
use crate::data::dataset::Dataset;
use crate::engine::rank::RankedEntry;
use crate::engine::scale::LinearScale;
use crate::foundation::core::{CategoryId, Rect, Rgba8};

/// Where a bar is in its lifecycle inside the visible window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarPhase {
    /// Sliding in from the off-window edge.
    Entering,
    /// Inside the window (possibly moving between slots).
    Steady,
    /// Sliding out toward the off-window edge; dropped once it gets there.
    Exiting,
}

/// Geometry and labels of one bar at one tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BarState {
    /// Label to draw.
    pub label: String,
    /// Fill color, fixed per category.
    pub color: Rgba8,
    /// Displayed value.
    pub value: f64,
    /// Current rank (1-based).
    pub rank: usize,
    /// Eased slot position; slot `0` is the top of the window, slot `K` the off-window edge.
    pub slot: f64,
    /// Bar rectangle in canvas pixels.
    pub rect: Rect,
    /// Lifecycle phase.
    pub phase: BarPhase,
    #[serde(skip)]
    from_slot: f64,
    #[serde(skip)]
    to_slot: f64,
    #[serde(skip)]
    elapsed: f64,
}

/// Bars keyed by category, as produced by one layout pass.
pub type Layout = BTreeMap<CategoryId, BarState>;

/// Color used when a ranked id is missing from the dataset's category table.
const FALLBACK_COLOR: Rgba8 = Rgba8::rgb(0x99, 0x99, 0x99);

/// Converts ranks and values into bar rectangles with eased slot motion.
#[derive(Clone, Debug, PartialEq)]
pub struct BarLayout {
    /// Plot area; bars grow rightwards from its left edge and stack downwards from its top.
    pub plot: Rect,
    /// Window size K.
    pub visible: usize,
    /// Fraction of a slot left empty between bars, `0..1`.
    pub padding: f64,
    /// Duration of a slot change, in seconds.
    pub transition_secs: f64,
    /// Easing of slot changes.
    pub ease: Ease,
}

impl BarLayout {
    /// Height of one rank slot.
    pub fn slot_height(&self) -> f64 {
        self.plot.height() / self.visible.max(1) as f64
    }

    /// Slot index of the off-window edge where bars enter and leave.
    pub fn edge_slot(&self) -> f64 {
        self.visible as f64
    }

    /// Lay out `ranked` after `step_secs` seconds have passed since `previous`.
    ///
    /// Pure: identical inputs give identical output. Bars keep easing from wherever `previous`
    /// left them; a bar that finished exiting in `previous` is not carried over.
    pub fn layout(
        &self,
        ranked: &[RankedEntry],
        previous: &Layout,
        value_scale: &LinearScale,
        dataset: &Dataset,
        step_secs: f64,
    ) -> Layout {
        let step = if step_secs.is_finite() {
            step_secs.max(0.0)
        } else {
            0.0
        };
        let mut out = Layout::new();

        for entry in ranked {
            let prev = previous.get(&entry.id);
            if !entry.visible && prev.is_none_or(|p| self.exit_done(p)) {
                continue;
            }
            let target = if entry.visible {
                (entry.rank - 1) as f64
            } else {
                self.edge_slot()
            };
            let (label, color) = match dataset.category(entry.id.as_str()) {
                Some(c) => (c.label.clone(), c.color),
                None => (entry.id.to_string(), FALLBACK_COLOR),
            };
            let bar = self.advance(prev, target, entry.visible, step, |from, to, elapsed| {
                BarState {
                    label,
                    color,
                    value: entry.value,
                    rank: entry.rank,
                    slot: 0.0,
                    rect: Rect::ZERO,
                    phase: BarPhase::Steady,
                    from_slot: from,
                    to_slot: to,
                    elapsed,
                }
            });
            out.insert(entry.id.clone(), self.place(bar, value_scale));
        }

        // Categories that vanished from the ranking entirely leave like any other bar.
        let ranked_ids: BTreeSet<&CategoryId> = ranked.iter().map(|e| &e.id).collect();
        for (id, prev) in previous {
            if ranked_ids.contains(id) || self.exit_done(prev) {
                continue;
            }
            let bar = self.advance(Some(prev), self.edge_slot(), false, step, |from, to, elapsed| {
                BarState {
                    from_slot: from,
                    to_slot: to,
                    elapsed,
                    ..prev.clone()
                }
            });
            out.insert(id.clone(), self.place(bar, value_scale));
        }

        out
    }

    fn exit_done(&self, bar: &BarState) -> bool {
        bar.phase == BarPhase::Exiting
            && bar.to_slot == self.edge_slot()
            && progress(bar.elapsed, self.transition_secs) >= 1.0
    }

    fn advance(
        &self,
        prev: Option<&BarState>,
        target: f64,
        visible: bool,
        step: f64,
        build: impl FnOnce(f64, f64, f64) -> BarState,
    ) -> BarState {
        let (from, elapsed, entering) = match prev {
            None => (self.edge_slot(), step, true),
            Some(p) if p.to_slot != target => (p.slot, step, p.phase != BarPhase::Steady),
            Some(p) => (p.from_slot, p.elapsed + step, p.phase == BarPhase::Entering),
        };
        let mut bar = build(from, target, elapsed);
        let t = progress(elapsed, self.transition_secs);
        bar.slot = self.ease.between(from, target, t);
        bar.phase = if !visible {
            BarPhase::Exiting
        } else if entering && t < 1.0 {
            BarPhase::Entering
        } else {
            BarPhase::Steady
        };
        bar
    }

    fn place(&self, mut bar: BarState, value_scale: &LinearScale) -> BarState {
        let slot_h = self.slot_height();
        let pad = slot_h * self.padding.clamp(0.0, 0.95);
        let y0 = self.plot.y0 + bar.slot * slot_h + pad / 2.0;
        let len = (value_scale.map(bar.value) - value_scale.map(0.0)).clamp(0.0, self.plot.width());
        bar.rect = Rect::new(self.plot.x0, y0, self.plot.x0 + len, y0 + slot_h - pad);
        bar
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/layout.rs"]
mod tests;
