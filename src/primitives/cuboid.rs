use nalgebra::Point3;

use super::check_extent;
use crate::algo::extrude::extrude_polygon;
use crate::error::Result;
use crate::mesh::{build_from_boundaries, HalfEdgeMesh, MeshIndex, PolyBoundary};

/// An axis-aligned box with the given full extents.
///
/// The bottom rectangle at `-z/2` is built as a planar outline and extruded
/// along +Z by `z`. Vertices 1-4 form the bottom, 5-8 the top.
pub fn cuboid<I: MeshIndex>(x: f64, y: f64, z: f64) -> Result<HalfEdgeMesh<I>> {
    check_extent("x", x)?;
    check_extent("y", y)?;
    check_extent("z", z)?;

    let (hx, hy, hz) = (x / 2.0, y / 2.0, z / 2.0);
    let bottom = PolyBoundary::outer(vec![
        Point3::new(-hx, hy, -hz),
        Point3::new(-hx, -hy, -hz),
        Point3::new(hx, -hy, -hz),
        Point3::new(hx, hy, -hz),
    ]);

    let mut mesh = build_from_boundaries(&[bottom])?;
    extrude_polygon(&mut mesh, z, false)?;
    Ok(mesh)
}
