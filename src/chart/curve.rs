use crate::foundation::core::{BezPath, Point};

/// Polyline through `points`.
pub(crate) fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path
}

/// Uniform Catmull-Rom spline through `points`, as cubic Béziers.
///
/// Endpoints are duplicated so the curve passes through every point, first and last included.
pub(crate) fn catmull_rom(points: &[Point]) -> BezPath {
    if points.len() < 3 {
        return polyline(points);
    }
    let mut path = BezPath::new();
    path.move_to(points[0]);
    let last = points.len() - 1;
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        path.curve_to(c1, c2, p2);
    }
    path
}
