use super::*;

fn values(pairs: &[(&str, f64)]) -> Values {
    pairs.iter().map(|&(k, v)| (CategoryId::from(k), v)).collect()
}

fn order(ranked: &[RankedEntry]) -> Vec<&str> {
    ranked.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn sorts_descending_with_window() {
    let r = rank(&values(&[("a", 1.0), ("b", 3.0), ("c", 2.0)]), 2);
    assert_eq!(order(&r), ["b", "c", "a"]);
    let ranks: Vec<usize> = r.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, [1, 2, 3]);
    let vis: Vec<bool> = r.iter().map(|e| e.visible).collect();
    assert_eq!(vis, [true, true, false]);
}

#[test]
fn ties_break_by_id_ascending() {
    let r = rank(&values(&[("zeta", 5.0), ("alpha", 5.0), ("mid", 5.0), ("top", 9.0)]), 10);
    assert_eq!(order(&r), ["top", "alpha", "mid", "zeta"]);
}

#[test]
fn ranks_are_a_permutation() {
    let mut v = Values::new();
    for i in 0..50u32 {
        v.insert(CategoryId::new(format!("c{i:02}")), f64::from(i % 7));
    }
    let r = rank(&v, 5);
    let mut ranks: Vec<usize> = r.iter().map(|e| e.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=50).collect::<Vec<_>>());
    assert_eq!(r.iter().filter(|e| e.visible).count(), 5);
    for w in r.windows(2) {
        assert!(w[0].value > w[1].value || (w[0].value == w[1].value && w[0].id < w[1].id));
    }
}

#[test]
fn window_larger_than_population() {
    let r = rank(&values(&[("a", 1.0)]), 12);
    assert!(r[0].visible);
    assert_eq!(visible_max(&r), 1.0);
    assert_eq!(visible_max(&[]), 0.0);
}

#[test]
fn entrant_overtakes_kth_incumbent() {
    // C grows from 0 toward 20 while the second incumbent sits at 10.
    let before = rank(&values(&[("A", 30.0), ("B", 10.0), ("C", 4.0)]), 2);
    assert!(!before[2].visible);
    assert_eq!(before[2].id.as_str(), "C");
    let after = rank(&values(&[("A", 30.0), ("B", 10.0), ("C", 12.0)]), 2);
    assert_eq!(order(&after), ["A", "C", "B"]);
    assert!(after[1].visible);
    assert!(!after[2].visible);
}
