//! 2D predicates on reduced points.

use nalgebra::Point3;

/// Ray-crossing parity test of a point against one closed ring.
///
/// Uses the half-open crossing rule from Real-Time Rendering (4th ed.,
/// §22.12), so a point on a horizontal edge is decided consistently.
pub fn point_in_ring_2d(point: &Point3<f64>, ring: &[Point3<f64>]) -> bool {
    let Some(last) = ring.last() else {
        return false;
    };

    let mut inside = false;
    let mut prev = last;
    let mut y0 = prev.y >= point.y;

    for cur in ring {
        let y1 = cur.y >= point.y;
        if y0 != y1
            && ((cur.y - point.y) * (prev.x - cur.x) >= (cur.x - point.x) * (prev.y - cur.y)) == y1
        {
            inside = !inside;
        }
        y0 = y1;
        prev = cur;
    }

    inside
}

/// Point-in-polygon over several rings (an outer boundary and its holes).
///
/// Each ring is closed on its own and the crossings are combined by parity,
/// so a point inside a hole is outside the polygon.
pub fn point_in_polygon_2d<R: AsRef<[Point3<f64>]>>(point: &Point3<f64>, rings: &[R]) -> bool {
    rings
        .iter()
        .map(AsRef::as_ref)
        .filter(|ring| point_in_ring_2d(point, ring))
        .count()
        % 2
        == 1
}

/// Signed angle at `v2` between `v1 - v2` and `v3 - v2`, in `[-π, π]`.
pub fn signed_angle(v1: &Point3<f64>, v2: &Point3<f64>, v3: &Point3<f64>) -> f64 {
    let first = v1 - v2;
    let second = v3 - v2;
    let cross = first.x * second.y - first.y * second.x;
    let dot = first.x * second.x + first.y * second.y;
    cross.atan2(dot)
}

/// Whether the angle formed at `v2` exceeds π.
///
/// An angle of exactly -π (a straight continuation) is not counted.
pub fn is_angle_greater_pi(v1: &Point3<f64>, v2: &Point3<f64>, v3: &Point3<f64>) -> bool {
    let angle = signed_angle(v1, v2, v3);
    if -angle == std::f64::consts::PI {
        return false;
    }
    angle < 0.0
}

/// Whether the angle formed at `v2` is at least π.
pub fn is_angle_greater_or_equal_pi(v1: &Point3<f64>, v2: &Point3<f64>, v3: &Point3<f64>) -> bool {
    signed_angle(v1, v2, v3) <= 0.0
}

/// Winding of a polygon in the XY plane (see the shoelace variant at
/// <http://blog.element84.com/polygon-winding.html>).
///
/// Only meaningful for polygons that do not collapse when `z` is dropped.
pub fn is_counter_clockwise(points: &[Point3<f64>]) -> bool {
    let n = points.len();
    let sum: f64 = (0..n)
        .map(|i| {
            let cur = &points[i];
            let next = &points[(i + 1) % n];
            (next.x - cur.x) * (next.y + cur.y)
        })
        .sum();
    sum < 0.0
}

/// Whether segment `p1 p2` intersects segment `p3 p4`
/// (Antonio, "Faster Line Segment Intersection", Graphics Gems III).
///
/// Touching endpoints count as an intersection.
pub fn is_line_intersecting_line(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> bool {
    let a = p2 - p1;
    let b = p3 - p4;
    let c = p1 - p3;

    let alpha = b.y * c.x - b.x * c.y;
    let beta = a.x * c.y - a.y * c.x;
    let denominator = a.y * b.x - a.x * b.y;

    let within = |num: f64| {
        if denominator > 0.0 {
            (0.0..=denominator).contains(&num)
        } else {
            (denominator..=0.0).contains(&num)
        }
    };

    within(alpha) && within(beta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3<f64> {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn test_point_in_ring() {
        let square = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        assert!(point_in_ring_2d(&p(2.0, 2.0), &square));
        assert!(!point_in_ring_2d(&p(5.0, 2.0), &square));
        assert!(!point_in_ring_2d(&p(2.0, -1.0), &square));
        assert!(!point_in_ring_2d(&p(2.0, 2.0), &[]));
    }

    #[test]
    fn test_point_in_polygon_with_hole() {
        let outer = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        let hole = vec![p(1.0, 1.0), p(1.0, 3.0), p(3.0, 3.0), p(3.0, 1.0)];
        let rings = [outer, hole];

        assert!(point_in_polygon_2d(&p(0.5, 2.0), &rings));
        assert!(!point_in_polygon_2d(&p(2.0, 2.0), &rings));
        assert!(!point_in_polygon_2d(&p(6.0, 2.0), &rings));
    }

    #[test]
    fn test_angles() {
        // Counter-clockwise walk: a convex corner gives a positive angle.
        let convex = signed_angle(&p(1.0, 0.0), &p(0.0, 0.0), &p(0.0, 1.0));
        assert!((convex - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(!is_angle_greater_pi(&p(1.0, 0.0), &p(0.0, 0.0), &p(0.0, 1.0)));

        assert!(is_angle_greater_pi(&p(0.0, 1.0), &p(0.0, 0.0), &p(1.0, 0.0)));
        assert!(is_angle_greater_or_equal_pi(&p(0.0, 1.0), &p(0.0, 0.0), &p(1.0, 0.0)));
    }

    #[test]
    fn test_straight_angle() {
        // Collinear points: the angle is ±π depending on the sign of zero.
        let (a, b, c) = (p(-1.0, 0.0), p(0.0, 0.0), p(1.0, 0.0));
        assert_eq!(signed_angle(&a, &b, &c).abs(), std::f64::consts::PI);
        assert!(!is_angle_greater_pi(&a, &b, &c));
    }

    #[test]
    fn test_winding() {
        let ccw = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(is_counter_clockwise(&ccw));

        let mut cw = ccw;
        cw.reverse();
        assert!(!is_counter_clockwise(&cw));
    }

    #[test]
    fn test_line_intersection() {
        assert!(is_line_intersecting_line(
            &p(0.0, 0.0),
            &p(2.0, 2.0),
            &p(0.0, 2.0),
            &p(2.0, 0.0)
        ));
        assert!(!is_line_intersecting_line(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(0.0, 1.0),
            &p(1.0, 1.0)
        ));
        // The lines cross, the segments do not.
        assert!(!is_line_intersecting_line(
            &p(0.0, 0.0),
            &p(1.0, 1.0),
            &p(3.0, 0.0),
            &p(2.0, 1.0)
        ));
        // Shared endpoint.
        assert!(is_line_intersecting_line(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 1.0)
        ));
    }
}
