use super::*;

#[test]
fn bounded_lerp_hits_endpoints_exactly() {
    assert_eq!(lerp_bounded(0.1, 0.7, 0.0), 0.1);
    assert_eq!(lerp_bounded(0.1, 0.7, 1.0), 0.7);
    assert_eq!(lerp_bounded(3.0, -2.0, 5.0), -2.0);
    assert_eq!(lerp_bounded(3.0, -2.0, -1.0), 3.0);
}

#[test]
fn bounded_lerp_never_overshoots() {
    let (a, b) = (0.1_f64, 0.30000000000000004_f64);
    for i in 0..=1000 {
        let t = f64::from(i) / 1000.0;
        let v = lerp_bounded(a, b, t);
        assert!(v >= a.min(b) && v <= a.max(b), "t={t} v={v}");
    }
}

#[test]
fn inverse_lerp_handles_empty_span() {
    assert_eq!(inverse_lerp(2.0, 2.0, 5.0), 0.0);
    assert_eq!(inverse_lerp(0.0, 4.0, 1.0), 0.25);
}
