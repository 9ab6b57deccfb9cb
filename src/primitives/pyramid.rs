use nalgebra::Point3;

use super::check_extent;
use crate::error::Result;
use crate::mesh::{build_from_polygons, HalfEdgeMesh, MeshIndex};

/// A square-based pyramid with full extents `x`, `y` and `z`.
///
/// The base lies at `-y/2` and the apex at `(0, y/2, 0)`. Handles are
/// deterministic: vertices 1-4 are the base corners and 5 the apex, faces
/// 2-5 are the sides and 6 the base, half-edges 1-12 run around the sides
/// and 13-16 around the base.
pub fn pyramid<I: MeshIndex>(x: f64, y: f64, z: f64) -> Result<HalfEdgeMesh<I>> {
    check_extent("x", x)?;
    check_extent("y", y)?;
    check_extent("z", z)?;

    let (hx, hy, hz) = (x / 2.0, y / 2.0, z / 2.0);
    let positions = [
        Point3::new(-hx, -hy, -hz),
        Point3::new(hx, -hy, -hz),
        Point3::new(hx, -hy, hz),
        Point3::new(-hx, -hy, hz),
        Point3::new(0.0, hy, 0.0),
    ];
    let apex = 4;

    let mut faces: Vec<Vec<usize>> = (0..4).map(|i| vec![apex, i, (i + 1) % 4]).collect();
    faces.push(vec![0, 3, 2, 1]);

    build_from_polygons(&positions, &faces)
}
