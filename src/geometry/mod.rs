//! Geometric primitives.
//!
//! Stateless helpers used throughout the kernel: Newell face normals, mean
//! positions, projection into a face's 2D frame, and the 2D predicates that
//! run in that frame (point-in-polygon, angle classification, winding, line
//! intersection).
//!
//! The 2D predicates work on points that have already been reduced with
//! [`reduce_2d`]; only their `x` and `y` coordinates are read. The
//! [`face`](self::face) submodule offers mesh-aware forms that do the
//! reduction themselves.

pub mod face;
mod predicates;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};

pub use face::{
    is_face_angle_greater_or_equal_pi, is_face_angle_greater_pi, is_point_in_face,
    is_vertex_adjacent_to_vertex, is_vertex_in_face, reduced_face_loops, reduced_position,
};
pub use predicates::{
    is_angle_greater_or_equal_pi, is_angle_greater_pi, is_counter_clockwise,
    is_line_intersecting_line, point_in_polygon_2d, point_in_ring_2d, signed_angle,
};

/// Maximum distance from a face's supporting plane at which a point still
/// counts as lying on the face.
pub const PLANE_EPSILON: f64 = 1e-4;

/// Decimal places kept by [`reduce_2d`].
const REDUCE_DECIMALS: i32 = 5;

/// Compute a polygon normal with Newell's method (Graphics Gems III, p. 232).
///
/// The accumulated vector is negated before normalization, so a loop that
/// runs counter-clockwise when seen from +Z gets the normal `-Z`. A
/// degenerate polygon yields the zero vector.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let cur = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (cur.y - next.y) * (cur.z + next.z);
        normal.y += (cur.z - next.z) * (cur.x + next.x);
        normal.z += (cur.x - next.x) * (cur.y + next.y);
    }

    let len = normal.norm();
    if len < f64::EPSILON {
        log::warn!("degenerate polygon with {} points has no normal", n);
        return Vector3::zeros();
    }
    -normal / len
}

/// Arithmetic mean of a set of positions.
///
/// # Errors
///
/// [`MeshError::InvalidArgument`] for an empty slice.
pub fn mean_position(points: &[Point3<f64>]) -> Result<Point3<f64>> {
    if points.is_empty() {
        return Err(MeshError::invalid_argument(
            "points",
            0,
            "the mean of no positions is undefined",
        ));
    }
    let sum = points
        .iter()
        .fold(Vector3::<f64>::zeros(), |acc, p| acc + p.coords);
    Ok(Point3::from(sum / points.len() as f64))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    // Avoid handing out -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn parallel_to(normal: &Vector3<f64>, axis: &Vector3<f64>) -> bool {
    (normal - axis).norm_squared() < 1e-18
}

/// Express a point in the 2D frame of a face with the given normal.
///
/// The frame's Z axis is the (normalized) normal. Two axis-aligned cases are
/// fixed: a `+Z` normal mirrors the point across the Y axis and a `-Z`
/// normal returns it unchanged. Otherwise the new Y axis is `n × Z` and the
/// new X axis is `n × (n × Z)`. The result is rounded to five decimals.
pub fn reduce_2d(point: &Point3<f64>, normal: &Vector3<f64>) -> Point3<f64> {
    let n = normal.normalize();
    let z = Vector3::z();

    if parallel_to(&n, &z) {
        return Point3::new(-point.x, point.y, point.z);
    }
    if parallel_to(&n, &-z) {
        return *point;
    }

    let v2 = n.cross(&z).normalize();
    let v3 = n.cross(&v2).normalize();
    let p = point.coords;

    Point3::new(
        round_to(v3.dot(&p), REDUCE_DECIMALS),
        round_to(v2.dot(&p), REDUCE_DECIMALS),
        round_to(n.dot(&p), REDUCE_DECIMALS),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_newell_orientation() {
        let ccw = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert_relative_eq!(newell_normal(&ccw), Vector3::new(0.0, 0.0, -1.0));

        let mut cw = ccw;
        cw.reverse();
        assert_relative_eq!(newell_normal(&cw), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_newell_tilted_and_degenerate() {
        // Clockwise seen from +X.
        let tilted = [
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        assert_relative_eq!(newell_normal(&tilted), Vector3::new(1.0, 0.0, 0.0));

        let line = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert_eq!(newell_normal(&line), Vector3::zeros());
    }

    #[test]
    fn test_mean_position() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 4.0, 6.0),
            Point3::new(0.0, 4.0, 6.0),
        ];
        assert_relative_eq!(mean_position(&points).unwrap(), Point3::new(1.0, 2.0, 3.0));
        assert!(matches!(
            mean_position(&[]),
            Err(MeshError::InvalidArgument { name: "points", .. })
        ));
    }

    #[test]
    fn test_reduce_axis_aligned() {
        let p = Point3::new(2.0, 3.0, 4.0);
        assert_eq!(reduce_2d(&p, &Vector3::new(0.0, 0.0, 1.0)), Point3::new(-2.0, 3.0, 4.0));
        assert_eq!(reduce_2d(&p, &Vector3::new(0.0, 0.0, -1.0)), p);
    }

    #[test]
    fn test_reduce_general_frame() {
        let p = Point3::new(2.0, 3.0, 4.0);
        let reduced = reduce_2d(&p, &Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(reduced, Point3::new(-4.0, -3.0, 2.0));

        // The frame is orthonormal, so distances survive the reduction.
        let n = Vector3::new(1.0, 1.0, 1.0);
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);
        let d = (reduce_2d(&a, &n) - reduce_2d(&b, &n)).norm();
        assert_relative_eq!(d, 2f64.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_reduce_rounds() {
        let n = Vector3::new(0.0, 1.0, 1.0);
        let reduced = reduce_2d(&Point3::new(1.0 / 3.0, 0.0, 0.0), &n);
        assert_eq!(reduced.y, round_to(reduced.y, 5));
        assert!((reduced.y.abs() - 0.33333).abs() < 1e-12);
    }
}
