//! Event vertex classification for monotone decomposition.

use std::cmp::Ordering;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::geometry::{is_angle_greater_pi, reduced_position};
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};

/// Role of a face vertex in a top-to-bottom sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexType {
    /// Both neighbours below, interior angle under π.
    Start,
    /// Both neighbours above, interior angle under π.
    End,
    /// Both neighbours below, interior angle over π.
    Split,
    /// Both neighbours above, interior angle over π.
    Merge,
    /// One neighbour above and one below.
    Regular,
}

/// Whether `neighbour` comes after `point` in sweep order.
fn is_under(point: &Point3<f64>, neighbour: &Point3<f64>) -> bool {
    point.y > neighbour.y || (point.y == neighbour.y && point.x < neighbour.x)
}

/// Sweep order: higher first, then left to right.
fn sweep_order(a: &Point3<f64>, b: &Point3<f64>) -> Ordering {
    b.y.partial_cmp(&a.y)
        .unwrap_or(Ordering::Equal)
        .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
}

/// Classify `v` by its neighbours on the boundary of `face`.
///
/// # Errors
///
/// - [`MeshError::HandleNotFound`] for unknown handles
/// - [`MeshError::InvalidArgument`] if `v` is not on `face` or the face has
///   no usable plane
pub fn classify_vertex<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    v: VertexId<I>,
) -> Result<VertexType> {
    mesh.vertex(v)?;
    let he = mesh.halfedge_in_face(v, face).ok_or_else(|| {
        MeshError::invalid_argument("v", v, "vertex is not on the face boundary")
    })?;
    let next = mesh.dest(he);
    let prev = mesh.origin(mesh.prev(he));

    let p = reduced_position(mesh, face, v)?;
    let p_next = reduced_position(mesh, face, next)?;
    let p_prev = reduced_position(mesh, face, prev)?;
    let reflex = is_angle_greater_pi(&p_next, &p, &p_prev);

    let kind = match (is_under(&p, &p_prev), is_under(&p, &p_next)) {
        (true, true) if reflex => VertexType::Split,
        (true, true) => VertexType::Start,
        (false, false) if reflex => VertexType::Merge,
        (false, false) => VertexType::End,
        _ => VertexType::Regular,
    };
    Ok(kind)
}

/// Every vertex of `face` (all loops) in sweep order.
pub fn sorted_events<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, face: FaceId<I>) -> Result<Vec<VertexId<I>>> {
    mesh.face(face)?;
    let mut events = mesh
        .face_vertices(face)
        .map(|v| reduced_position(mesh, face, v).map(|p| (v, p)))
        .collect::<Result<Vec<_>>>()?;
    events.sort_by(|a, b| sweep_order(&a.1, &b.1));
    Ok(events.into_iter().map(|(v, _)| v).collect())
}

/// Whether `face` is y-monotone in its own frame: no holes and no split or
/// merge vertices.
pub fn is_monotone<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, face: FaceId<I>) -> Result<bool> {
    if mesh.face(face)?.has_holes() {
        return Ok(false);
    }
    for v in mesh.face_outer_vertices(face) {
        if matches!(classify_vertex(mesh, face, v)?, VertexType::Split | VertexType::Merge) {
            return Ok(false);
        }
    }
    Ok(true)
}
