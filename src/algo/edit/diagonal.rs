//! Diagonal insertion.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::geometry::{is_point_in_face, is_vertex_adjacent_to_vertex, point_in_ring_2d, reduce_2d};
use crate::mesh::{Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Connect two non-adjacent vertices of a common face with a new edge.
///
/// When `p` and `q` lie on the same outer loop the face is split: the loop
/// through the new half-edge `q -> p` becomes a new face (which inherits the
/// old normal and any holes lying inside it) and `Some(new_face)` is
/// returned. When the diagonal reaches a hole, the hole is merged into the
/// loop it connects to, its entry is dropped from the face's hole list, and
/// `None` is returned.
///
/// # Errors
///
/// - [`MeshError::HandleNotFound`] if `p` or `q` does not exist
/// - [`MeshError::AdjacencyViolation`] if `p == q`, the vertices are
///   already adjacent, they share no bounded face, or both lie on the same
///   hole
pub fn insert_diagonal<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    p: VertexId<I>,
    q: VertexId<I>,
) -> Result<Option<FaceId<I>>> {
    mesh.vertex(p)?;
    mesh.vertex(q)?;

    if p == q {
        return Err(MeshError::adjacency(p.index(), q.index(), "a diagonal needs two distinct vertices"));
    }

    let face = common_face(mesh, p, q)?;
    let p_start = start_in_face(mesh, p, q, face)?;
    let q_start = start_in_face(mesh, q, p, face)?;

    if is_vertex_adjacent_to_vertex(mesh, p, q, p_start, q_start)
        || mesh.are_adjacent(p, q)
    {
        return Err(MeshError::adjacency(p.index(), q.index(), "vertices are already adjacent"));
    }

    let p_loop = loop_index(mesh, face, p_start)?;
    let q_loop = loop_index(mesh, face, q_start)?;
    if p_loop == q_loop && p_loop != 0 {
        return Err(MeshError::adjacency(
            p.index(),
            q.index(),
            "a diagonal cannot join two vertices of the same hole",
        ));
    }

    let normal = mesh.fc(face).normal;
    let from_p = mesh.add_halfedge(HalfEdge {
        normal,
        ..HalfEdge::with_origin(p, face)
    });
    let from_q = mesh.add_halfedge(HalfEdge {
        normal,
        ..HalfEdge::with_origin(q, face)
    });
    mesh.he_mut(from_p).twin = from_q;
    mesh.he_mut(from_q).twin = from_p;

    let p_prev = mesh.prev(p_start);
    let q_prev = mesh.prev(q_start);
    mesh.link(p_prev, from_p);
    mesh.link(from_p, q_start);
    mesh.link(q_prev, from_q);
    mesh.link(from_q, p_start);

    if p_loop != q_loop {
        // Two loops became one; forget the hole that was absorbed.
        let absorbed = p_loop.max(q_loop) - 1;
        let entry = mesh.fc_mut(face).inner.remove(absorbed);
        log::debug!(
            "diagonal {:?}-{:?} merged hole {:?} of {:?}",
            p,
            q,
            entry,
            face
        );
        return Ok(None);
    }

    let new_face = mesh.add_face(Face {
        normal,
        ..Face::new(from_q)
    });
    mesh.assign_loop_face(from_q, new_face);
    mesh.fc_mut(face).outer = from_p;

    move_enclosed_holes(mesh, face, new_face);

    log::debug!("diagonal {:?}-{:?} split {:?} off {:?}", p, q, new_face, face);

    Ok(Some(new_face))
}

/// The face both vertices bound. Several candidates are disambiguated by
/// the diagonal's midpoint.
fn common_face<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    p: VertexId<I>,
    q: VertexId<I>,
) -> Result<FaceId<I>> {
    let mut candidates: Vec<FaceId<I>> = mesh.vertex_faces(p).collect();
    candidates.sort();
    candidates.dedup();
    let q_faces: Vec<FaceId<I>> = mesh.vertex_faces(q).collect();
    candidates.retain(|f| q_faces.contains(f));

    match candidates.as_slice() {
        [] => Err(MeshError::adjacency(p.index(), q.index(), "vertices share no bounded face")),
        [only] => Ok(*only),
        _ => {
            let midpoint = Point3::from((mesh.position(p).coords + mesh.position(q).coords) * 0.5);
            for &f in &candidates {
                if is_point_in_face(mesh, f, &midpoint)? {
                    return Ok(f);
                }
            }
            Err(MeshError::adjacency(
                p.index(),
                q.index(),
                "no shared face contains the diagonal",
            ))
        }
    }
}

/// The half-edge leaving `v` inside `face` whose corner the diagonal
/// towards `towards` passes through.
///
/// A vertex can bound the same face more than once (after a hole merge), so
/// the corner is picked by angle when needed.
fn start_in_face<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
    towards: VertexId<I>,
    face: FaceId<I>,
) -> Result<HalfEdgeId<I>> {
    let options: Vec<HalfEdgeId<I>> = mesh
        .vertex_halfedges(v)
        .filter(|&he| mesh.face_of(he) == face)
        .collect();

    match options.as_slice() {
        [] => Err(MeshError::InvalidState(format!("{:?} lost its corner in {:?}", v, face))),
        [only] => Ok(*only),
        _ => {
            let normal = mesh.fc(face).normal;
            let at = reduce_2d(mesh.position(v), &normal);
            let target = reduce_2d(mesh.position(towards), &normal);
            let wedge = options.iter().copied().find(|&he| {
                let out = reduce_2d(mesh.position(mesh.dest(he)), &normal);
                let back = reduce_2d(mesh.position(mesh.origin(mesh.prev(he))), &normal);
                corner_contains(&at, &out, &back, &target)
            });
            Ok(wedge.unwrap_or(options[0]))
        }
    }
}

/// Whether `target` lies inside the face corner at `at`, the corner running
/// counter-clockwise from the edge towards `out` to the edge towards `back`.
fn corner_contains(at: &Point3<f64>, out: &Point3<f64>, back: &Point3<f64>, target: &Point3<f64>) -> bool {
    let angle = |p: &Point3<f64>| {
        let a = (p.y - at.y).atan2(p.x - at.x);
        let b = (out.y - at.y).atan2(out.x - at.x);
        (a - b).rem_euclid(std::f64::consts::TAU)
    };
    angle(target) < angle(back)
}

/// Position of the loop holding `he` in the face's loop list (0 = outer).
fn loop_index<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, face: FaceId<I>, he: HalfEdgeId<I>) -> Result<usize> {
    mesh.face_loops(face)
        .position(|start| mesh.halfedge_loop(start).any(|member| member == he))
        .ok_or_else(|| MeshError::InvalidState(format!("{:?} is on no loop of {:?}", he, face)))
}

/// Reassign the holes of `from` whose first vertex lies inside `to`'s outer
/// boundary.
fn move_enclosed_holes<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, from: FaceId<I>, to: FaceId<I>) {
    if !mesh.fc(from).has_holes() {
        return;
    }

    let normal = mesh.fc(to).normal;
    let ring: Vec<Point3<f64>> = mesh
        .face_outer_vertices(to)
        .map(|v| reduce_2d(mesh.position(v), &normal))
        .collect();

    let holes = mesh.fc(from).inner.clone();
    for entry in holes {
        let origin = reduce_2d(mesh.position(mesh.origin(entry)), &normal);
        if !point_in_ring_2d(&origin, &ring) {
            continue;
        }
        mesh.fc_mut(from).inner.retain(|&he| he != entry);
        mesh.fc_mut(to).inner.push(entry);
        mesh.assign_loop_face(entry, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_boundaries, PolyBoundary};

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(x0, y0, 0.0),
            Point3::new(x0 + size, y0, 0.0),
            Point3::new(x0 + size, y0 + size, 0.0),
            Point3::new(x0, y0 + size, 0.0),
        ]
    }

    #[test]
    fn test_diagonal_splits_quad() {
        let mut mesh: HalfEdgeMesh = build_from_boundaries(&[PolyBoundary::outer(square(0.0, 0.0, 1.0))]).unwrap();
        let old = FaceId::new(2);

        let new = insert_diagonal(&mut mesh, VertexId::new(1), VertexId::new(3))
            .unwrap()
            .unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.num_halfedges(), 10);
        assert_eq!(mesh.face_degree(old), 3);
        assert_eq!(mesh.face_degree(new), 3);
        assert_eq!(mesh.face_normal(new).unwrap(), mesh.face_normal(old).unwrap());
        assert!(mesh.are_adjacent(VertexId::new(1), VertexId::new(3)));
    }

    #[test]
    fn test_diagonal_rejects_neighbours() {
        let mut mesh: HalfEdgeMesh = build_from_boundaries(&[PolyBoundary::outer(square(0.0, 0.0, 1.0))]).unwrap();
        let err = insert_diagonal(&mut mesh, VertexId::new(1), VertexId::new(2)).unwrap_err();
        assert!(matches!(err, MeshError::AdjacencyViolation { p: 1, q: 2, .. }));

        let err = insert_diagonal(&mut mesh, VertexId::new(1), VertexId::new(1)).unwrap_err();
        assert!(matches!(err, MeshError::AdjacencyViolation { .. }));
        assert_eq!(mesh.num_halfedges(), 8);
    }

    #[test]
    fn test_diagonal_merges_hole() {
        let mut mesh: HalfEdgeMesh = build_from_boundaries(&[
            PolyBoundary::outer(square(0.0, 0.0, 4.0)),
            PolyBoundary::hole(square(1.0, 1.0, 2.0)),
        ])
        .unwrap();
        let face = FaceId::new(2);

        // The hole is re-oriented on construction, so (1, 1) is vertex 8.
        assert_eq!(*mesh.position(VertexId::new(8)), Point3::new(1.0, 1.0, 0.0));
        let result = insert_diagonal(&mut mesh, VertexId::new(1), VertexId::new(8)).unwrap();

        assert_eq!(result, None);
        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert!(!mesh.face(face).unwrap().has_holes());
        assert_eq!(mesh.num_faces(), 2);
        // 4 outer + 4 hole + both sides of the diagonal
        assert_eq!(mesh.face_degree(face), 10);
    }

    #[test]
    fn test_split_after_merge_closes_ring() {
        let mut mesh: HalfEdgeMesh = build_from_boundaries(&[
            PolyBoundary::outer(square(0.0, 0.0, 4.0)),
            PolyBoundary::hole(square(1.0, 1.0, 2.0)),
        ])
        .unwrap();

        // Hole corners after re-orientation: (1,1) is vertex 8, (3,3) is vertex 6.
        assert_eq!(*mesh.position(VertexId::new(6)), Point3::new(3.0, 3.0, 0.0));
        insert_diagonal(&mut mesh, VertexId::new(1), VertexId::new(8)).unwrap();
        let new = insert_diagonal(&mut mesh, VertexId::new(3), VertexId::new(6)).unwrap();

        assert!(new.is_some());
        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert_eq!(mesh.num_faces(), 3);
        let total: usize = mesh.bounded_face_ids().map(|f| mesh.face_degree(f)).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_hole_moves_to_new_face() {
        // A wide rectangle with a hole in its right half.
        let mut mesh: HalfEdgeMesh = build_from_boundaries(&[
            PolyBoundary::outer(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(8.0, 0.0, 0.0),
                Point3::new(8.0, 4.0, 0.0),
                Point3::new(4.0, 4.0, 0.0),
                Point3::new(0.0, 4.0, 0.0),
            ]),
            PolyBoundary::hole(square(5.0, 1.0, 2.0)),
        ])
        .unwrap();
        let old = FaceId::new(2);

        let new = insert_diagonal(&mut mesh, VertexId::new(2), VertexId::new(5))
            .unwrap()
            .unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        let right = if mesh.face(new).unwrap().has_holes() { new } else { old };
        let left = if right == new { old } else { new };
        assert_eq!(mesh.face(right).unwrap().inner.len(), 1);
        assert!(!mesh.face(left).unwrap().has_holes());
        assert!(mesh.face_outer_vertices(right).any(|v| mesh.position(v).x == 8.0));
    }
}
