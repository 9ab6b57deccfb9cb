use std::f64::consts::PI;

use nalgebra::Point3;

use super::{check_extent, check_resolution};
use crate::error::Result;
use crate::mesh::{build_from_polygons, HalfEdgeMesh, MeshIndex};

/// A cone standing on the XZ plane, apex up the Y axis.
///
/// The base circle is approximated by `slices` rim points (at least 3).
/// Each slice contributes one side triangle to the apex and one base
/// triangle to the base center.
pub fn cone<I: MeshIndex>(base_radius: f64, height: f64, slices: usize) -> Result<HalfEdgeMesh<I>> {
    check_extent("base_radius", base_radius)?;
    check_extent("height", height)?;
    check_resolution("slices", slices, 3)?;

    let half = height / 2.0;
    let step = 2.0 * PI / slices as f64;

    let mut positions = vec![Point3::new(0.0, half, 0.0), Point3::new(0.0, -half, 0.0)];
    let (apex, center) = (0, 1);
    for i in 1..=slices {
        let (sin, cos) = (step * i as f64).sin_cos();
        positions.push(Point3::new(cos * base_radius, -half, sin * base_radius));
    }

    let rim = |i: usize| 2 + i % slices;
    let mut faces = Vec::with_capacity(2 * slices);
    for i in 0..slices {
        let (prev, cur) = (rim(i + slices - 1), rim(i));
        faces.push([apex, prev, cur]);
        faces.push([center, cur, prev]);
    }

    build_from_polygons(&positions, &faces)
}
