//! Edge splitting.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Split the edge between `p` and `q` with a new vertex at `position`.
///
/// The half-edge `p -> q` is shortened to `p -> v` and followed by a new
/// half-edge `v -> q`; its twin is handled the same way from `q`. Both faces
/// keep their handles and gain one side each. Returns the new vertex.
///
/// # Errors
///
/// - [`MeshError::HandleNotFound`] if `p` or `q` does not exist
/// - [`MeshError::AdjacencyViolation`] if `p` and `q` share no edge
pub fn insert_vertex<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    p: VertexId<I>,
    q: VertexId<I>,
    position: Point3<f64>,
) -> Result<VertexId<I>> {
    mesh.vertex(p)?;
    mesh.vertex(q)?;

    let he1 = mesh
        .find_halfedge(p, q)
        .ok_or_else(|| MeshError::adjacency(p.index(), q.index(), "vertices are not adjacent"))?;
    Ok(split_halfedge(mesh, he1, position))
}

/// Split the edge of `he1` at a new vertex. `he1` keeps its origin and now
/// ends at the new vertex, as does its twin.
pub(crate) fn split_halfedge<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    he1: HalfEdgeId<I>,
    position: Point3<f64>,
) -> VertexId<I> {
    let he2 = mesh.twin(he1);
    let v = mesh.add_vertex(position);

    // new1 runs v -> p beside he2, new2 runs v -> q beside he1
    let new1 = mesh.add_halfedge(HalfEdge {
        normal: mesh.he(he2).normal,
        ..HalfEdge::with_origin(v, mesh.face_of(he2))
    });
    let new2 = mesh.add_halfedge(HalfEdge {
        normal: mesh.he(he1).normal,
        ..HalfEdge::with_origin(v, mesh.face_of(he1))
    });

    mesh.he_mut(he1).twin = new1;
    mesh.he_mut(new1).twin = he1;
    mesh.he_mut(he2).twin = new2;
    mesh.he_mut(new2).twin = he2;

    let after1 = mesh.next(he1);
    let after2 = mesh.next(he2);
    mesh.link(he1, new2);
    mesh.link(new2, after1);
    mesh.link(he2, new1);
    mesh.link(new1, after2);

    mesh.vx_mut(v).halfedge = new2;

    log::trace!("split {:?} at {:?}", he1, v);

    v
}
