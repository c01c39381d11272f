use super::*;
use crate::data::color::Palette;
use crate::data::dataset::{CategoryDecl, Keyframe};
use crate::engine::interp::Values;
use crate::engine::rank::rank;

fn dataset() -> Dataset {
    let decls = vec![CategoryDecl {
        id: "A".into(),
        label: Some("Alpha".to_owned()),
        color: Some(Rgba8::rgb(200, 10, 10).into()),
    }];
    let kf = Keyframe::new(0.0, [("A", 1.0), ("B", 1.0), ("C", 1.0)]);
    Dataset::new(decls, vec![kf], &Palette::default()).unwrap()
}

fn engine(visible: usize) -> BarLayout {
    BarLayout {
        plot: Rect::new(0.0, 0.0, 200.0, 100.0),
        visible,
        padding: 0.0,
        transition_secs: 1.0,
        ease: Ease::Linear,
    }
}

fn scale() -> LinearScale {
    LinearScale::new((0.0, 100.0), (0.0, 200.0))
}

fn ranked(pairs: &[(&str, f64)], k: usize) -> Vec<RankedEntry> {
    let v: Values = pairs.iter().map(|&(id, x)| (CategoryId::from(id), x)).collect();
    rank(&v, k)
}

#[test]
fn entrants_start_at_the_edge_and_settle() {
    let ds = dataset();
    let e = engine(2);
    let r = ranked(&[("A", 50.0), ("B", 20.0)], 2);

    let l0 = e.layout(&r, &Layout::new(), &scale(), &ds, 0.0);
    let a = &l0["A"];
    assert_eq!(a.slot, e.edge_slot());
    assert_eq!(a.phase, BarPhase::Entering);
    assert_eq!(a.rect.y0, 100.0);

    let l1 = e.layout(&r, &l0, &scale(), &ds, 0.5);
    assert_eq!(l1["A"].slot, 1.0);
    assert_eq!(l1["B"].slot, 1.5);

    let l2 = e.layout(&r, &l1, &scale(), &ds, 0.5);
    assert_eq!(l2["A"].slot, 0.0);
    assert_eq!(l2["B"].slot, 1.0);
    assert_eq!(l2["A"].phase, BarPhase::Steady);
    assert_eq!(l2["A"].rect, Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(l2["B"].rect, Rect::new(0.0, 50.0, 40.0, 100.0));
}

#[test]
fn rank_swaps_are_eased_not_snapped() {
    let ds = dataset();
    let e = engine(2);
    let settled = {
        let r = ranked(&[("A", 50.0), ("B", 20.0)], 2);
        let l = e.layout(&r, &Layout::new(), &scale(), &ds, 0.0);
        e.layout(&r, &l, &scale(), &ds, 1.0)
    };

    let swapped = ranked(&[("A", 20.0), ("B", 50.0)], 2);
    let l = e.layout(&swapped, &settled, &scale(), &ds, 0.25);
    assert_eq!(l["A"].slot, 0.25);
    assert_eq!(l["B"].slot, 0.75);
    assert_eq!(l["A"].rank, 2);

    let l = e.layout(&swapped, &l, &scale(), &ds, 0.75);
    assert_eq!(l["A"].slot, 1.0);
    assert_eq!(l["B"].slot, 0.0);
}

#[test]
fn leavers_slide_out_then_drop() {
    let ds = dataset();
    let e = engine(1);
    let first = ranked(&[("A", 50.0), ("B", 20.0)], 1);
    let l = e.layout(&first, &Layout::new(), &scale(), &ds, 0.0);
    let l = e.layout(&first, &l, &scale(), &ds, 1.0);
    assert!(!l.contains_key("B"));

    let flipped = ranked(&[("A", 10.0), ("B", 20.0)], 1);
    let l = e.layout(&flipped, &l, &scale(), &ds, 0.5);
    assert_eq!(l["A"].phase, BarPhase::Exiting);
    assert_eq!(l["A"].slot, 0.5);

    let l = e.layout(&flipped, &l, &scale(), &ds, 0.5);
    assert_eq!(l["A"].slot, e.edge_slot());
    assert!(l.contains_key("A"));

    let l = e.layout(&flipped, &l, &scale(), &ds, 0.1);
    assert!(!l.contains_key("A"));
    assert_eq!(l["B"].slot, 0.0);
}

#[test]
fn vanished_categories_also_exit() {
    let ds = dataset();
    let e = engine(2);
    let r = ranked(&[("A", 50.0), ("B", 20.0)], 2);
    let l = e.layout(&r, &Layout::new(), &scale(), &ds, 1.0);

    let only_a = ranked(&[("A", 50.0)], 2);
    let l = e.layout(&only_a, &l, &scale(), &ds, 1.0);
    assert_eq!(l["B"].phase, BarPhase::Exiting);
    assert_eq!(l["B"].value, 20.0);
    let l = e.layout(&only_a, &l, &scale(), &ds, 0.0);
    assert!(!l.contains_key("B"));
}

#[test]
fn layout_is_idempotent() {
    let ds = dataset();
    let e = engine(2);
    let r = ranked(&[("A", 50.0), ("B", 70.0), ("C", 10.0)], 2);
    let prev = e.layout(&r, &Layout::new(), &scale(), &ds, 0.3);
    let a = e.layout(&r, &prev, &scale(), &ds, 0.2);
    let b = e.layout(&r, &prev, &scale(), &ds, 0.2);
    assert_eq!(a, b);
}

#[test]
fn colors_and_labels_follow_the_category() {
    let ds = dataset();
    let e = engine(3);
    let r = ranked(&[("A", 5.0), ("B", 70.0)], 3);
    let l = e.layout(&r, &Layout::new(), &scale(), &ds, 1.0);
    assert_eq!(l["A"].label, "Alpha");
    assert_eq!(l["A"].color, Rgba8::rgb(200, 10, 10));
    assert_eq!(l["B"].color, ds.category("B").unwrap().color);

    let r = ranked(&[("A", 90.0), ("B", 70.0)], 3);
    let l = e.layout(&r, &l, &scale(), &ds, 1.0);
    assert_eq!(l["A"].color, Rgba8::rgb(200, 10, 10));
}

#[test]
fn bar_length_is_clamped_to_plot() {
    let ds = dataset();
    let e = engine(1);
    let r = ranked(&[("A", 500.0)], 1);
    let l = e.layout(&r, &Layout::new(), &scale(), &ds, 1.0);
    assert_eq!(l["A"].rect.width(), 200.0);
}
