//! Extrusion of planar regions.
//!
//! - [`extrude_polygon`] turns a flat mesh built from outlines (see
//!   [`build_from_boundaries`](crate::mesh::build_from_boundaries)) into a
//!   closed solid: a reversed, translated copy becomes the back side and one
//!   quad is stitched along every boundary edge.
//! - [`extrude_face`] pulls a single face out of a mesh, walling it in with
//!   side quads.
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::algo::extrude::extrude_polygon;
//! use nalgebra::Point3;
//!
//! let outline = PolyBoundary::outer(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//! let mut mesh: HalfEdgeMesh = build_from_boundaries(&[outline]).unwrap();
//!
//! let sides = extrude_polygon(&mut mesh, 2.0, false).unwrap();
//! assert_eq!(sides.len(), 4);
//! assert_eq!(mesh.num_faces(), 6);
//! assert!(!mesh.has_unbounded_face());
//! ```

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::error::{MeshError, Result};
use crate::geometry::newell_normal;
use crate::mesh::{Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, HandleOffsets, MeshIndex, VertexId};

fn check_offset(offset: f64) -> Result<()> {
    if !offset.is_finite() || offset == 0.0 {
        return Err(MeshError::invalid_argument(
            "offset",
            offset,
            "must be finite and non-zero",
        ));
    }
    Ok(())
}

/// Extrude a flat mesh into a closed solid.
///
/// The mesh is copied, the copy is moved by `offset` (along world +Z, or
/// along the normal of the unbounded face's first boundary loop when
/// `along_normal` is set), its winding is reversed, and it is merged back in
/// with every handle shifted past the original's. Each boundary half-edge
/// `h` of the original pairs with `h + max_halfedge_handle` in the copy; one
/// side quad is stitched per pair and the unbounded face is removed.
///
/// For an outline wound counter-clockwise in the XY plane both directions
/// agree, and all resulting normals point outwards.
///
/// Returns the side faces, boundary loop by boundary loop.
///
/// # Errors
///
/// [`MeshError::InvalidArgument`] if the mesh has no unbounded face or it
/// has no boundary loop, or if `offset` is zero or not finite.
pub fn extrude_polygon<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    offset: f64,
    along_normal: bool,
) -> Result<Vec<FaceId<I>>> {
    check_offset(offset)?;

    let unbounded = FaceId::unbounded();
    let entries = match mesh.face(unbounded) {
        Ok(face) if face.has_holes() => face.inner.clone(),
        _ => {
            return Err(MeshError::invalid_argument(
                "mesh",
                mesh.num_faces(),
                "extrusion needs an unbounded face with at least one boundary loop",
            ))
        }
    };

    let direction = if along_normal {
        let ring: Vec<_> = mesh
            .halfedge_loop(entries[0])
            .map(|he| *mesh.position(mesh.origin(he)))
            .collect();
        let n = newell_normal(&ring);
        if n == Vector3::zeros() {
            return Err(MeshError::invalid_argument(
                "mesh",
                entries[0],
                "the first boundary loop is degenerate",
            ));
        }
        n
    } else {
        Vector3::z()
    };

    // Boundary loops of the front side, and each member's successor
    let front: Vec<Vec<HalfEdgeId<I>>> = entries
        .iter()
        .map(|&e| mesh.halfedge_loop(e).collect())
        .collect();
    let mut successor: HashMap<HalfEdgeId<I>, HalfEdgeId<I>> = HashMap::new();
    for ring in &front {
        for (i, &he) in ring.iter().enumerate() {
            successor.insert(he, ring[(i + 1) % ring.len()]);
        }
    }

    let mut back = mesh.clone();
    for v in back.vertices.iter_mut().flatten() {
        v.position += direction * offset;
    }
    back.reverse_winding();

    let offsets = HandleOffsets::past(mesh);
    back.offset_handles(offsets);
    mesh.absorb(back)?;

    // One quad per boundary pair: f (a -> b), b -> b', f' (b' -> a'), a' -> a
    let mut sides = Vec::new();
    let mut climbs: HashMap<HalfEdgeId<I>, HalfEdgeId<I>> = HashMap::new();
    let mut descents: HashMap<HalfEdgeId<I>, HalfEdgeId<I>> = HashMap::new();
    for &f in front.iter().flatten() {
        let copy = f.offset(offsets.halfedges);
        let b = mesh.dest(f);
        let a_copy = mesh.dest(copy);

        let climb = mesh.add_halfedge(HalfEdge::with_origin(b, FaceId::invalid()));
        let descent = mesh.add_halfedge(HalfEdge::with_origin(a_copy, FaceId::invalid()));
        let quad = mesh.add_face(Face::new(f));

        mesh.link(f, climb);
        mesh.link(climb, copy);
        mesh.link(copy, descent);
        mesh.link(descent, f);
        mesh.assign_loop_face(f, quad);

        climbs.insert(f, climb);
        descents.insert(f, descent);
        sides.push(quad);
    }

    for (&f, &climb) in &climbs {
        let descent = descents[&successor[&f]];
        mesh.he_mut(climb).twin = descent;
        mesh.he_mut(descent).twin = climb;
    }

    mesh.remove_face(unbounded)?;
    for &quad in &sides {
        mesh.update_face_normal(quad)?;
    }

    log::debug!(
        "extruded polygon by {} along {:?}: {} side faces",
        offset,
        direction,
        sides.len()
    );

    Ok(sides)
}

/// Extrude one face by `offset` along `direction`.
///
/// `direction` defaults to the face's normal; a given direction is
/// normalized. Each boundary vertex of the face stays with the face and is
/// moved, while a duplicate takes its place (and all its other half-edges)
/// at the old position. One side quad is built per boundary edge between
/// the moved face and the surrounding mesh. Returns the side faces in
/// boundary order, starting at the face's outer half-edge.
///
/// # Errors
///
/// - [`MeshError::HandleNotFound`] if `face` does not exist
/// - [`MeshError::InvalidArgument`] for the unbounded face, a face with
///   holes, a zero direction, or an offset that is zero or not finite
pub fn extrude_face<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    face: FaceId<I>,
    offset: f64,
    direction: Option<Vector3<f64>>,
) -> Result<Vec<FaceId<I>>> {
    check_offset(offset)?;
    let record = mesh.face(face)?;
    if !record.outer.is_valid() {
        return Err(MeshError::invalid_argument(
            "face",
            face,
            "the unbounded face cannot be extruded",
        ));
    }
    if record.has_holes() {
        return Err(MeshError::invalid_argument(
            "face",
            face,
            "faces with holes cannot be extruded",
        ));
    }

    let direction = direction.unwrap_or(record.normal);
    let len = direction.norm();
    if len < f64::EPSILON {
        return Err(MeshError::invalid_argument(
            "direction",
            format!("{:?}", direction),
            "must not be the zero vector",
        ));
    }
    let shift = direction / len * offset;

    let boundary: Vec<HalfEdgeId<I>> = mesh.face_halfedges(face).collect();
    let n = boundary.len();
    let corners: Vec<VertexId<I>> = boundary.iter().map(|&he| mesh.origin(he)).collect();
    let outside: Vec<HalfEdgeId<I>> = boundary.iter().map(|&he| mesh.twin(he)).collect();

    // Every corner's fan, except the face's own edge, moves to a duplicate
    let fans: Vec<Vec<HalfEdgeId<I>>> = boundary
        .iter()
        .zip(&corners)
        .map(|(&own, &v)| mesh.vertex_halfedges(v).filter(|&he| he != own).collect())
        .collect();

    let mut duplicates: Vec<VertexId<I>> = Vec::with_capacity(n);
    for i in 0..n {
        let v = corners[i];
        let old = *mesh.position(v);
        let w = mesh.add_vertex(old);
        for &he in &fans[i] {
            mesh.he_mut(he).origin = w;
        }
        mesh.vx_mut(v).position = old + shift;
        mesh.vx_mut(v).halfedge = boundary[i];
        duplicates.push(w);
    }

    // Vertical pairs between each duplicate and its moved corner
    let mut ups = Vec::with_capacity(n);
    let mut downs = Vec::with_capacity(n);
    for i in 0..n {
        let (up, down) = mesh.add_edge_pair(duplicates[i], corners[i]);
        ups.push(up);
        downs.push(down);
    }

    // Side quads: w_i -> w_i+1 -> v_i+1 -> v_i
    let mut sides = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        let base = mesh.add_halfedge(HalfEdge {
            twin: outside[i],
            ..HalfEdge::with_origin(duplicates[i], FaceId::invalid())
        });
        let top = mesh.add_halfedge(HalfEdge {
            twin: boundary[i],
            ..HalfEdge::with_origin(corners[j], FaceId::invalid())
        });
        mesh.he_mut(outside[i]).twin = base;
        mesh.he_mut(boundary[i]).twin = top;

        let quad = mesh.add_face(Face::new(base));
        mesh.link(base, ups[j]);
        mesh.link(ups[j], top);
        mesh.link(top, downs[i]);
        mesh.link(downs[i], base);
        mesh.assign_loop_face(base, quad);
        mesh.vx_mut(duplicates[i]).halfedge = base;
        sides.push(quad);
    }

    for &quad in &sides {
        mesh.update_face_normal(quad)?;
    }
    mesh.update_face_normal(face)?;

    log::debug!("extruded {:?} by {:?} into {} side faces", face, shift, n);

    Ok(sides)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::{build_from_boundaries, PolyBoundary};
    use crate::primitives::cuboid;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(x0, y0, 0.0),
            Point3::new(x0 + size, y0, 0.0),
            Point3::new(x0 + size, y0 + size, 0.0),
            Point3::new(x0, y0 + size, 0.0),
        ]
    }

    /// Every face normal points away from the solid's center.
    fn assert_outward(mesh: &HalfEdgeMesh, center: Point3<f64>) {
        for f in mesh.bounded_face_ids() {
            let c = mesh.face_centroid(f).unwrap();
            let n = mesh.face_normal(f).unwrap();
            assert!(n.dot(&(c - center)) > 0.0, "{:?} faces inwards", f);
        }
    }

    #[test]
    fn test_extrude_square() {
        let mut mesh: HalfEdgeMesh = build_from_boundaries(&[PolyBoundary::outer(square(0.0, 0.0, 1.0))]).unwrap();
        let sides = extrude_polygon(&mut mesh, 1.0, false).unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert_eq!(sides.len(), 4);
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_halfedges(), 24);
        assert_eq!(mesh.num_faces(), 6);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(!mesh.has_unbounded_face());
        assert_outward(&mesh, Point3::new(0.5, 0.5, 0.5));

        // The copy of vertex 1 sits one unit above it.
        assert_eq!(*mesh.position(VertexId::new(5)), Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_extrude_along_normal_matches_z() {
        let mut a: HalfEdgeMesh = build_from_boundaries(&[PolyBoundary::outer(square(0.0, 0.0, 1.0))]).unwrap();
        let mut b = a.clone();
        extrude_polygon(&mut a, 0.5, false).unwrap();
        extrude_polygon(&mut b, 0.5, true).unwrap();
        for (v, w) in a.vertices().zip(b.vertices()) {
            assert_relative_eq!(v.1.position, w.1.position);
        }
    }

    #[test]
    fn test_extrude_with_hole() {
        let mut mesh: HalfEdgeMesh = build_from_boundaries(&[
            PolyBoundary::outer(square(0.0, 0.0, 4.0)),
            PolyBoundary::hole(square(1.0, 1.0, 2.0)),
        ])
        .unwrap();

        let sides = extrude_polygon(&mut mesh, 2.0, false).unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert_eq!(sides.len(), 8);
        assert_eq!(mesh.num_vertices(), 16);
        // Front, back and eight side walls
        assert_eq!(mesh.num_faces(), 10);
        assert_eq!(mesh.num_edges(), 24);
        assert_eq!(mesh.face(FaceId::new(2)).unwrap().inner.len(), 1);
        assert_eq!(mesh.face(FaceId::new(4)).unwrap().inner.len(), 1);
    }

    #[test]
    fn test_extrude_polygon_needs_boundary() {
        let mut mesh: HalfEdgeMesh = cuboid(1.0, 1.0, 1.0).unwrap();
        let err = extrude_polygon(&mut mesh, 1.0, false).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { name: "mesh", .. }));

        let mut flat: HalfEdgeMesh = build_from_boundaries(&[PolyBoundary::outer(square(0.0, 0.0, 1.0))]).unwrap();
        let err = extrude_polygon(&mut flat, 0.0, false).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { name: "offset", .. }));
    }

    #[test]
    fn test_extrude_cuboid_face() {
        let mut mesh: HalfEdgeMesh = cuboid(2.0, 2.0, 2.0).unwrap();
        let face = mesh.bounded_face_ids().next().unwrap();
        let normal = mesh.face_normal(face).unwrap();
        let before = mesh.face_centroid(face).unwrap();

        let sides = extrude_face(&mut mesh, face, 1.0, None).unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert_eq!(sides.len(), 4);
        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(mesh.num_halfedges(), 40);
        assert_eq!(mesh.num_faces(), 10);
        assert_eq!(mesh.euler_characteristic(), 2);

        let after = mesh.face_centroid(face).unwrap();
        assert_relative_eq!(after, before + normal);
        assert_relative_eq!(mesh.face_normal(face).unwrap(), normal);
        assert_outward(&mesh, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_extrude_face_direction() {
        let mut mesh: HalfEdgeMesh = cuboid(2.0, 2.0, 2.0).unwrap();
        let face = mesh.bounded_face_ids().next().unwrap();
        let before = mesh.face_centroid(face).unwrap();

        extrude_face(&mut mesh, face, 0.5, Some(Vector3::new(0.0, 4.0, 0.0))).unwrap();
        assert!(mesh.is_valid());
        assert_relative_eq!(mesh.face_centroid(face).unwrap(), before + Vector3::new(0.0, 0.5, 0.0));

        let err = extrude_face(&mut mesh, face, 0.5, Some(Vector3::zeros())).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { name: "direction", .. }));
    }
}
