//! Face insetting.

use crate::error::{MeshError, Result};
use crate::geometry::mean_position;
use crate::mesh::{Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Handles created for one boundary edge of the inset face.
struct RingEdge<I: MeshIndex> {
    /// Original corner -> inset corner, on the ring quad.
    up: HalfEdgeId<I>,
    /// Inset edge, on the center face.
    inner: HalfEdgeId<I>,
    /// Inset edge, on the ring quad.
    across: HalfEdgeId<I>,
    /// Inset corner -> original corner, on the ring quad.
    down: HalfEdgeId<I>,
    vertex: VertexId<I>,
    face: FaceId<I>,
}

/// Shrink `face` towards its centroid, surrounding it with a ring of quads.
///
/// Every outer corner gets an inset copy at `mean + (pos - mean) * offset`.
/// Each original boundary edge ends up on a new quad joining it to the
/// matching inset edge, while `face` keeps its handle and now runs along the
/// inset vertices. Holes stay with the center face. Returns the ring faces
/// in boundary order, starting at the face's outer half-edge. Every ring
/// face takes over the stored normal of `face`.
///
/// # Errors
///
/// - [`MeshError::InvalidArgument`] unless `0 < offset < 1`, or for the
///   unbounded face
/// - [`MeshError::HandleNotFound`] if `face` does not exist
pub fn inset_face<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    face: FaceId<I>,
    offset: f64,
) -> Result<Vec<FaceId<I>>> {
    if !(offset > 0.0 && offset < 1.0) {
        return Err(MeshError::invalid_argument(
            "offset",
            offset,
            "must lie strictly between 0 and 1",
        ));
    }
    let start = mesh.face(face)?.outer;
    if !start.is_valid() {
        return Err(MeshError::invalid_argument(
            "face",
            face,
            "the unbounded face cannot be inset",
        ));
    }

    let boundary: Vec<HalfEdgeId<I>> = mesh.halfedge_loop(start).collect();
    let corners: Vec<_> = boundary.iter().map(|&he| *mesh.position(mesh.origin(he))).collect();
    let mean = mean_position(&corners)?;
    let normal = mesh.fc(face).normal;

    // First pass: one quad per boundary edge, closed around the old edge
    let mut ring: Vec<RingEdge<I>> = Vec::with_capacity(boundary.len());
    for (&edge, corner) in boundary.iter().zip(&corners) {
        let vertex = mesh.add_vertex(mean + (corner - mean) * offset);
        let ahead = mesh.dest(edge);

        let up = mesh.add_halfedge(HalfEdge::with_origin(ahead, FaceId::invalid()));
        let inner = mesh.add_halfedge(HalfEdge::with_origin(vertex, face));
        let across = mesh.add_halfedge(HalfEdge::new());
        let down = mesh.add_halfedge(HalfEdge::with_origin(vertex, FaceId::invalid()));
        let quad = mesh.add_face(Face {
            normal,
            ..Face::new(up)
        });

        mesh.he_mut(inner).twin = across;
        mesh.he_mut(across).twin = inner;

        mesh.link(edge, up);
        mesh.link(up, across);
        mesh.link(across, down);
        mesh.link(down, edge);
        mesh.assign_loop_face(edge, quad);

        mesh.vx_mut(vertex).halfedge = down;

        ring.push(RingEdge {
            up,
            inner,
            across,
            down,
            vertex,
            face: quad,
        });
    }

    // Second pass: stitch neighbouring quads and close the center loop
    let n = ring.len();
    for i in 0..n {
        let prev = &ring[(i + n - 1) % n];
        let next = &ring[(i + 1) % n];
        let cur = &ring[i];
        let (prev_up, prev_inner, next_inner, next_vertex) = (prev.up, prev.inner, next.inner, next.vertex);
        let (inner, across, down) = (cur.inner, cur.across, cur.down);

        mesh.link(prev_inner, inner);
        mesh.link(inner, next_inner);
        mesh.he_mut(across).origin = next_vertex;
        mesh.he_mut(down).twin = prev_up;
        mesh.he_mut(prev_up).twin = down;
    }
    mesh.fc_mut(face).outer = ring[n - 1].inner;

    // The ring inherits the stored normal even when the face is not planar
    for r in &ring {
        mesh.set_face_normal(r.face, normal)?;
    }
    mesh.set_face_normal(face, normal)?;

    log::debug!("inset {:?} by {} into {} ring faces", face, offset, n);

    Ok(ring.into_iter().map(|r| r.face).collect())
}
