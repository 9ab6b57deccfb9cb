//! Mesh-aware geometric queries.
//!
//! These resolve handles, reduce the involved positions into the face's 2D
//! frame using the stored face normal, and defer to the pure predicates.

use nalgebra::{Point3, Vector3};

use super::{is_angle_greater_or_equal_pi, is_angle_greater_pi, point_in_polygon_2d, reduce_2d, PLANE_EPSILON};
use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// The stored normal of a bounded, non-degenerate face.
fn plane_normal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, face: FaceId<I>) -> Result<Vector3<f64>> {
    let f = mesh.face(face)?;
    if !f.outer.is_valid() {
        return Err(MeshError::invalid_argument(
            "face",
            face,
            "the unbounded face has no supporting plane",
        ));
    }
    if f.normal.norm_squared() < f64::EPSILON {
        return Err(MeshError::invalid_argument(
            "face",
            face,
            "face is degenerate and has no normal",
        ));
    }
    Ok(f.normal)
}

/// Position of `v` in the 2D frame of `face`.
pub fn reduced_position<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    v: VertexId<I>,
) -> Result<Point3<f64>> {
    let normal = plane_normal(mesh, face)?;
    Ok(reduce_2d(&mesh.vertex(v)?.position, &normal))
}

/// Every loop of `face` (outer first, then holes) in the face's 2D frame.
pub fn reduced_face_loops<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
) -> Result<Vec<Vec<Point3<f64>>>> {
    let normal = plane_normal(mesh, face)?;
    Ok(mesh
        .face_loops(face)
        .map(|start| {
            mesh.halfedge_loop(start)
                .map(|he| reduce_2d(mesh.position(mesh.origin(he)), &normal))
                .collect()
        })
        .collect())
}

/// Whether vertex `v` lies inside `face`, holes excluded.
pub fn is_vertex_in_face<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    v: VertexId<I>,
) -> Result<bool> {
    let point = reduced_position(mesh, face, v)?;
    let loops = reduced_face_loops(mesh, face)?;
    Ok(point_in_polygon_2d(&point, &loops))
}

/// Whether an arbitrary 3D point lies inside `face`, holes excluded.
///
/// Points farther than [`PLANE_EPSILON`] from the face's supporting plane
/// are outside.
pub fn is_point_in_face<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    point: &Point3<f64>,
) -> Result<bool> {
    let normal = plane_normal(mesh, face)?;
    let anchor = mesh.position(mesh.origin(mesh.fc(face).outer));
    let distance = normal.normalize().dot(&(point - anchor));
    if distance.abs() > PLANE_EPSILON {
        log::trace!("point {:?} is {} off the plane of {:?}", point, distance, face);
        return Ok(false);
    }

    let loops = reduced_face_loops(mesh, face)?;
    Ok(point_in_polygon_2d(&reduce_2d(point, &normal), &loops))
}

fn reduced_triple<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    vs: [VertexId<I>; 3],
) -> Result<[Point3<f64>; 3]> {
    let normal = plane_normal(mesh, face)?;
    let mut out = [Point3::origin(); 3];
    for (slot, v) in out.iter_mut().zip(vs) {
        *slot = reduce_2d(&mesh.vertex(v)?.position, &normal);
    }
    Ok(out)
}

/// [`is_angle_greater_pi`] on three vertices reduced into `face`'s frame.
pub fn is_face_angle_greater_pi<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    v1: VertexId<I>,
    v2: VertexId<I>,
    v3: VertexId<I>,
) -> Result<bool> {
    let [a, b, c] = reduced_triple(mesh, face, [v1, v2, v3])?;
    Ok(is_angle_greater_pi(&a, &b, &c))
}

/// [`is_angle_greater_or_equal_pi`] on three vertices reduced into `face`'s frame.
pub fn is_face_angle_greater_or_equal_pi<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    v1: VertexId<I>,
    v2: VertexId<I>,
    v3: VertexId<I>,
) -> Result<bool> {
    let [a, b, c] = reduced_triple(mesh, face, [v1, v2, v3])?;
    Ok(is_angle_greater_or_equal_pi(&a, &b, &c))
}

/// Whether `p` and `q` are joined by the edge following one of the given
/// outgoing half-edges.
///
/// `p_start` must leave `p` and `q_start` must leave `q`; only those two
/// half-edges are checked.
pub fn is_vertex_adjacent_to_vertex<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    p: VertexId<I>,
    q: VertexId<I>,
    p_start: HalfEdgeId<I>,
    q_start: HalfEdgeId<I>,
) -> bool {
    mesh.dest(p_start) == q || mesh.dest(q_start) == p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_boundaries, PolyBoundary};

    fn square_with_hole() -> HalfEdgeMesh {
        build_from_boundaries(&[
            PolyBoundary::outer(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 4.0, 0.0),
                Point3::new(0.0, 4.0, 0.0),
            ]),
            PolyBoundary::hole(vec![
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 3.0, 0.0),
                Point3::new(3.0, 3.0, 0.0),
                Point3::new(3.0, 1.0, 0.0),
            ]),
        ])
        .unwrap()
    }

    fn tilted_triangle() -> HalfEdgeMesh {
        // Lies in the plane x + z = 2.
        build_from_boundaries(&[PolyBoundary::outer(vec![
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 3.0, 1.0),
        ])])
        .unwrap()
    }

    #[test]
    fn test_centroid_inside_and_off_plane() {
        let mesh = tilted_triangle();
        let f = FaceId::new(2);
        let centroid = mesh.face_centroid(f).unwrap();
        assert!(is_point_in_face(&mesh, f, &centroid).unwrap());

        let normal = mesh.face_normal(f).unwrap();
        let lifted = centroid + normal * 0.5;
        assert!(!is_point_in_face(&mesh, f, &lifted).unwrap());
        assert!(!is_point_in_face(&mesh, f, &(centroid + normal * 10.0)).unwrap());
    }

    #[test]
    fn test_cuboid_centroids_against_far_points() {
        let mesh: HalfEdgeMesh = crate::primitives::cuboid(1.0, 2.0, 3.0).unwrap();
        for f in mesh.bounded_face_ids() {
            let centroid = mesh.face_centroid(f).unwrap();
            let normal = mesh.face_normal(f).unwrap();
            assert!(is_point_in_face(&mesh, f, &centroid).unwrap(), "{:?}", f);
            assert!(!is_point_in_face(&mesh, f, &(centroid + normal * 10.0)).unwrap(), "{:?}", f);
        }
    }

    #[test]
    fn test_hole_excluded() {
        let mesh = square_with_hole();
        let f = FaceId::new(2);
        assert!(!is_point_in_face(&mesh, f, &Point3::new(2.0, 2.0, 0.0)).unwrap());
        assert!(is_point_in_face(&mesh, f, &Point3::new(0.5, 2.0, 0.0)).unwrap());
        assert!(!is_point_in_face(&mesh, f, &Point3::new(5.0, 2.0, 0.0)).unwrap());
        assert_eq!(reduced_face_loops(&mesh, f).unwrap().len(), 2);
    }

    #[test]
    fn test_unbounded_face_rejected() {
        let mesh = square_with_hole();
        let err = is_point_in_face(&mesh, FaceId::unbounded(), &Point3::origin()).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { name: "face", .. }));
        assert!(is_vertex_in_face(&mesh, FaceId::new(9), VertexId::new(1)).is_err());
    }

    #[test]
    fn test_face_angles() {
        // An L-shaped hexagon: the corner at (1, 1) is reflex.
        let mesh: HalfEdgeMesh = build_from_boundaries(&[PolyBoundary::outer(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ])])
        .unwrap();
        let f = FaceId::new(2);
        let v = VertexId::new;

        // Arguments are (next, vertex, prev) around the loop.
        assert!(is_face_angle_greater_pi(&mesh, f, v(5), v(4), v(3)).unwrap());
        assert!(!is_face_angle_greater_pi(&mesh, f, v(3), v(2), v(1)).unwrap());
        assert!(is_face_angle_greater_or_equal_pi(&mesh, f, v(5), v(4), v(3)).unwrap());
    }

    #[test]
    fn test_adjacency_through_start_edges() {
        let mesh = square_with_hole();
        let p = VertexId::new(1);
        let q = VertexId::new(2);
        let r = VertexId::new(3);
        let p_start = mesh.vertex(p).unwrap().halfedge;
        let q_start = mesh.vertex(q).unwrap().halfedge;
        let r_start = mesh.vertex(r).unwrap().halfedge;
        assert!(is_vertex_adjacent_to_vertex(&mesh, p, q, p_start, q_start));
        assert!(!is_vertex_adjacent_to_vertex(&mesh, p, r, p_start, r_start));
    }
}
