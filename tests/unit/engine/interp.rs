use super::*;
use crate::data::color::Palette;

fn kf(time: f64, values: &[(&str, f64)]) -> Keyframe {
    Keyframe::new(time, values.iter().map(|&(k, v)| (k, v)))
}

fn race() -> Dataset {
    Dataset::new(
        vec![],
        vec![
            kf(0.0, &[("A", 10.0), ("B", 5.0)]),
            kf(1.0, &[("A", 8.0), ("B", 12.0)]),
            kf(2.0, &[("A", 15.0), ("B", 3.0)]),
        ],
        &Palette::default(),
    )
    .unwrap()
}

#[test]
fn linear_midpoints() {
    let ds = race();
    let s = sample(&ds, 0.5, MissingPolicy::Zero);
    assert_eq!((s.prev, s.next, s.t), (0, 1, 0.5));
    assert_eq!(s.values["A"], 9.0);
    assert_eq!(s.values["B"], 8.5);

    let s = sample(&ds, 1.5, MissingPolicy::Zero);
    assert!((s.values["A"] - 11.5).abs() < 1e-12);
    assert!((s.values["B"] - 7.5).abs() < 1e-12);
}

#[test]
fn t_is_clamped() {
    let a = kf(0.0, &[("x", 2.0)]);
    let b = kf(1.0, &[("x", 4.0)]);
    assert_eq!(interpolate(&a, &b, -1.0)["x"], 2.0);
    assert_eq!(interpolate(&a, &b, 2.0)["x"], 4.0);
}

#[test]
fn never_overshoots() {
    let a = kf(0.0, &[("x", 0.1), ("y", 1e9), ("z", -3.3)]);
    let b = kf(1.0, &[("x", 0.7), ("y", 1e-9), ("z", 17.25)]);
    for i in 0..=500 {
        let t = f64::from(i) / 500.0;
        let v = interpolate(&a, &b, t);
        for (id, &x) in &v {
            let (p, n) = (a.values[id], b.values[id]);
            assert!(x >= p.min(n) && x <= p.max(n), "{id} at t={t}: {x}");
        }
    }
}

#[test]
fn keyframe_instants_reproduce_raw_values() {
    let ds = race();
    for kf in ds.keyframes() {
        let s = sample(&ds, kf.time, MissingPolicy::Zero);
        for (id, v) in &kf.values {
            assert_eq!(s.values[id].to_bits(), v.to_bits());
        }
    }
}

#[test]
fn missing_side_counts_as_zero() {
    let a = kf(0.0, &[("A", 10.0)]);
    let b = kf(1.0, &[("A", 10.0), ("C", 20.0)]);
    let v = interpolate(&a, &b, 0.0);
    assert_eq!(v["C"], 0.0);
    let v = interpolate(&a, &b, 0.25);
    assert_eq!(v["C"], 5.0);

    let v = interpolate(&b, &a, 0.5);
    assert_eq!(v["C"], 10.0);
}

#[test]
fn omit_policy_drops_partial_categories() {
    let a = kf(0.0, &[("A", 10.0), ("gone", 3.0)]);
    let b = kf(1.0, &[("A", 10.0), ("C", 20.0)]);
    let v = interpolate_with(&a, &b, 0.5, MissingPolicy::Omit);
    assert_eq!(v.len(), 1);
    assert!(v.contains_key("A"));
}

#[test]
fn omit_policy_keeps_raw_values_on_keyframes() {
    let ds = Dataset::new(
        vec![],
        vec![
            kf(0.0, &[("A", 1.0), ("X", 5.0)]),
            kf(1.0, &[("A", 2.0)]),
            kf(2.0, &[("A", 3.0), ("Y", 7.0)]),
        ],
        &Palette::default(),
    )
    .unwrap();
    for kf in ds.keyframes() {
        let s = sample(&ds, kf.time, MissingPolicy::Omit);
        assert_eq!(s.values, kf.values, "at {}", kf.time);
    }
    let mid = sample(&ds, 0.5, MissingPolicy::Omit);
    assert!(!mid.values.contains_key("X"));
}

#[test]
fn single_keyframe_is_returned_unchanged() {
    let ds = Dataset::new(vec![], vec![kf(3.0, &[("A", 1.5)])], &Palette::default()).unwrap();
    let s = sample(&ds, 100.0, MissingPolicy::Zero);
    assert_eq!(s.values, ds.keyframes()[0].values);
    assert_eq!((s.prev, s.next), (0, 0));
}
