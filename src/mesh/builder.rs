//! Mesh construction utilities.
//!
//! Two entry points build a valid half-edge mesh from scratch:
//!
//! - [`build_from_boundaries`] takes planar outlines (outer boundaries and
//!   holes) and produces one bounded face per outer boundary, surrounded by
//!   the unbounded face.
//! - [`build_from_polygons`] takes a face-vertex polygon soup and stitches
//!   twins through a directed edge map. The primitive generators use it.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};
use crate::geometry::newell_normal;

/// One ordered polygon outline handed to [`build_from_boundaries`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolyBoundary {
    /// The outline's points in order. The closing edge is implicit.
    pub points: Vec<Point3<f64>>,

    /// `true` for an outer boundary, `false` for a hole in the most recent
    /// outer boundary.
    pub is_outer: bool,
}

impl PolyBoundary {
    /// An outer boundary.
    pub fn outer(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            is_outer: true,
        }
    }

    /// A hole in the preceding outer boundary.
    pub fn hole(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            is_outer: false,
        }
    }
}

/// Build a planar mesh from outer boundaries and holes.
///
/// Face 1 is the unbounded face. Each outer boundary becomes a new face
/// whose outer half-edge is the first edge of the outline; each hole is
/// attached to the face created by the most recent outer boundary. The
/// twins of every outline form a loop in the unbounded face and are
/// registered there as one hole entry per outline.
///
/// Holes are re-oriented when needed so they always wind against their
/// enclosing boundary.
///
/// # Errors
///
/// - [`MeshError::InvalidArgument`] for empty input or a hole that comes
///   before any outer boundary
/// - [`MeshError::DegenerateBoundary`] for an outline with fewer than three points
/// - [`MeshError::DuplicateVertex`] when a point repeats an earlier one
///
/// # Example
/// ```
/// use trellis::mesh::{build_from_boundaries, HalfEdgeMesh, PolyBoundary};
/// use nalgebra::Point3;
///
/// let square = PolyBoundary::outer(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]);
///
/// let mesh: HalfEdgeMesh = build_from_boundaries(&[square]).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_halfedges(), 8);
/// assert_eq!(mesh.num_faces(), 2); // the square and the unbounded face
/// ```
pub fn build_from_boundaries<I: MeshIndex>(boundaries: &[PolyBoundary]) -> Result<HalfEdgeMesh<I>> {
    if boundaries.is_empty() {
        return Err(MeshError::invalid_argument(
            "boundaries",
            0,
            "at least one outer boundary is required",
        ));
    }
    if !boundaries[0].is_outer {
        return Err(MeshError::invalid_argument(
            "boundaries",
            0,
            "a hole needs an enclosing outer boundary before it",
        ));
    }

    let mut seen: Vec<Point3<f64>> = Vec::new();
    for (bi, boundary) in boundaries.iter().enumerate() {
        if boundary.points.len() < 3 {
            return Err(MeshError::DegenerateBoundary { boundary: bi });
        }
        for (pi, p) in boundary.points.iter().enumerate() {
            if seen.contains(p) {
                return Err(MeshError::DuplicateVertex {
                    boundary: bi,
                    point: pi,
                });
            }
            seen.push(*p);
        }
    }

    let total_points = seen.len();
    let mut mesh = HalfEdgeMesh::with_capacity(total_points, total_points * 2, boundaries.len() + 1);
    let unbounded = mesh.add_face(Face::unbounded());

    let mut current_face = FaceId::invalid();
    let mut outer_normal = nalgebra::Vector3::<f64>::zeros();

    for boundary in boundaries {
        let mut points = boundary.points.clone();
        if boundary.is_outer {
            outer_normal = newell_normal(&points);
        } else if newell_normal(&points).dot(&outer_normal) > 0.0 {
            points.reverse();
        }

        let vertices: Vec<VertexId<I>> = points.iter().map(|&p| mesh.add_vertex(p)).collect();
        let n = vertices.len();

        let mut inner: Vec<HalfEdgeId<I>> = Vec::with_capacity(n);
        let mut outer: Vec<HalfEdgeId<I>> = Vec::with_capacity(n);
        for i in 0..n {
            let (he, twin) = mesh.add_edge_pair(vertices[i], vertices[(i + 1) % n]);
            inner.push(he);
            outer.push(twin);
            mesh.vx_mut(vertices[i]).halfedge = he;
        }
        for i in 0..n {
            mesh.link(inner[i], inner[(i + 1) % n]);
            mesh.link(outer[(i + 1) % n], outer[i]);
        }

        if boundary.is_outer {
            current_face = mesh.add_face(Face::new(inner[0]));
        } else {
            mesh.fc_mut(current_face).inner.push(inner[0]);
        }
        mesh.assign_loop_face(inner[0], current_face);
        mesh.assign_loop_face(outer[0], unbounded);
        mesh.fc_mut(unbounded).inner.push(outer[0]);
    }

    mesh.recompute_normals();

    log::debug!(
        "built mesh from {} boundaries: {} vertices, {} half-edges, {} faces",
        boundaries.len(),
        mesh.num_vertices(),
        mesh.num_halfedges(),
        mesh.num_faces()
    );

    Ok(mesh)
}

/// Build a half-edge mesh from positions and polygon faces.
///
/// Each face lists vertex indices into `positions`. Half-edges are created
/// face by face in input order, so handle numbering is deterministic: face
/// `k` receives handle `k + 2` (handle 1 is the unbounded face) and its
/// half-edges follow those of face `k - 1`. Edges without a partner face get
/// twins in the unbounded face; if every edge is matched the mesh is closed
/// and the unbounded face is removed again.
///
/// # Example
/// ```
/// use trellis::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh: HalfEdgeMesh = build_from_polygons(&positions, &[[0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_halfedges(), 6);
/// assert!(mesh.is_valid());
/// ```
pub fn build_from_polygons<I: MeshIndex, F: AsRef<[usize]>>(
    positions: &[Point3<f64>],
    faces: &[F],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::invalid_argument(
            "faces",
            0,
            "at least one face is required",
        ));
    }

    let mut used = vec![false; positions.len()];
    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for (k, &vi) in face.iter().enumerate() {
            if vi >= positions.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[..k].contains(&vi) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
            used[vi] = true;
        }
    }
    if let Some(unused) = used.iter().position(|&u| !u) {
        return Err(MeshError::invalid_argument(
            "positions",
            unused,
            "vertex is not referenced by any face",
        ));
    }

    let corners: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = HalfEdgeMesh::with_capacity(positions.len(), corners * 2, faces.len() + 1);
    let unbounded = mesh.add_face(Face::unbounded());

    let vertex_ids: Vec<VertexId<I>> = positions.iter().map(|&p| mesh.add_vertex(p)).collect();

    // Map from directed edge (v0, v1) to half-edge ID
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::with_capacity(corners);
    let mut face_edges: Vec<Vec<HalfEdgeId<I>>> = Vec::with_capacity(faces.len());

    // First pass: one half-edge per corner, linked into its face loop
    for face in faces {
        let face = face.as_ref();
        let n = face.len();
        let hes: Vec<HalfEdgeId<I>> = face
            .iter()
            .map(|&vi| mesh.add_halfedge(HalfEdge::with_origin(vertex_ids[vi], FaceId::invalid())))
            .collect();

        for k in 0..n {
            let key = (face[k], face[(k + 1) % n]);
            if edge_map.insert(key, hes[k]).is_some() {
                return Err(MeshError::NonManifoldEdge {
                    v0: key.0,
                    v1: key.1,
                });
            }
            mesh.link(hes[k], hes[(k + 1) % n]);
            mesh.vx_mut(vertex_ids[face[k]]).halfedge = hes[k];
        }

        let fid = mesh.add_face(Face::new(hes[0]));
        mesh.assign_loop_face(hes[0], fid);
        face_edges.push(hes);
    }

    // Second pass: link twins in face order, closing open edges with the
    // unbounded face
    let mut boundary: Vec<HalfEdgeId<I>> = Vec::new();
    for (face, hes) in faces.iter().zip(&face_edges) {
        let face = face.as_ref();
        let n = face.len();
        for k in 0..n {
            let he = hes[k];
            if mesh.twin(he).is_valid() {
                continue;
            }
            let (v0, v1) = (face[k], face[(k + 1) % n]);
            let twin = match edge_map.get(&(v1, v0)) {
                Some(&twin) => twin,
                None => {
                    let twin = mesh.add_halfedge(HalfEdge::with_origin(vertex_ids[v1], unbounded));
                    boundary.push(twin);
                    twin
                }
            };
            mesh.he_mut(he).twin = twin;
            mesh.he_mut(twin).twin = he;
        }
    }

    if boundary.is_empty() {
        mesh.remove_face(unbounded)?;
    } else {
        link_boundary_loops(&mut mesh, &boundary)?;
    }

    mesh.recompute_normals();

    log::debug!(
        "built mesh from {} polygons: {} vertices, {} half-edges, {} open edges",
        faces.len(),
        mesh.num_vertices(),
        mesh.num_halfedges(),
        boundary.len()
    );

    Ok(mesh)
}

/// Link boundary half-edges into loops and register each loop with the
/// unbounded face.
fn link_boundary_loops<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    boundary: &[HalfEdgeId<I>],
) -> Result<()> {
    // Group by origin vertex for quick lookup
    let mut outgoing: HashMap<VertexId<I>, HalfEdgeId<I>> = HashMap::with_capacity(boundary.len());
    for &he in boundary {
        let origin = mesh.origin(he);
        if outgoing.insert(origin, he).is_some() {
            return Err(MeshError::invalid_argument(
                "faces",
                origin,
                "vertex lies on more than one boundary fan",
            ));
        }
    }

    // The next boundary half-edge starts where this one ends
    for &he in boundary {
        let dest = mesh.dest(he);
        let next = *outgoing.get(&dest).ok_or_else(|| {
            MeshError::InvalidState(format!("open boundary chain at {:?}", dest))
        })?;
        mesh.link(he, next);
    }

    let unbounded = FaceId::unbounded();
    let mut visited: HashSet<HalfEdgeId<I>> = HashSet::with_capacity(boundary.len());
    for &he in boundary {
        if visited.contains(&he) {
            continue;
        }
        visited.extend(mesh.halfedge_loop(he));
        mesh.fc_mut(unbounded).inner.push(he);
    }

    Ok(())
}

/// Export bounded faces as positions plus per-face vertex index loops.
///
/// Indices are compact (0-based, in ascending vertex handle order), so the
/// output can be fed straight back into [`build_from_polygons`].
pub fn face_vertex_lists<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let mut compact: HashMap<VertexId<I>, usize> = HashMap::with_capacity(mesh.num_vertices());
    let positions: Vec<Point3<f64>> = mesh
        .vertices()
        .enumerate()
        .map(|(i, (id, v))| {
            compact.insert(id, i);
            v.position
        })
        .collect();

    let faces = mesh
        .bounded_face_ids()
        .map(|f| mesh.face_outer_vertices(f).map(|v| compact[&v]).collect())
        .collect();

    (positions, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(offset: f64, size: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(offset, offset, 0.0),
            Point3::new(offset + size, offset, 0.0),
            Point3::new(offset + size, offset + size, 0.0),
            Point3::new(offset, offset + size, 0.0),
        ]
    }

    #[test]
    fn test_single_boundary() {
        let mesh: HalfEdgeMesh = build_from_boundaries(&[PolyBoundary::outer(square(0.0, 1.0))]).unwrap();

        assert!(mesh.is_valid());
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_halfedges(), 8);

        let unbounded = mesh.face(FaceId::unbounded()).unwrap();
        assert_eq!(unbounded.inner.len(), 1);
        assert!(!unbounded.outer.is_valid());

        // Interleaved handles: face edges are odd, their twins even.
        let face = mesh.face(FaceId::new(2)).unwrap();
        assert_eq!(face.outer.index(), 1);
        assert_eq!(mesh.twin(face.outer).index(), 2);
        assert_eq!(face.normal, nalgebra::Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_hole_is_reoriented() {
        // Both outlines counter-clockwise; the hole must be flipped.
        let mesh: HalfEdgeMesh = build_from_boundaries(&[
            PolyBoundary::outer(square(0.0, 4.0)),
            PolyBoundary::hole(square(1.0, 2.0)),
        ])
        .unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        let face = mesh.face(FaceId::new(2)).unwrap();
        assert_eq!(face.inner.len(), 1);
        assert_eq!(mesh.face(FaceId::unbounded()).unwrap().inner.len(), 2);

        let hole: Vec<Point3<f64>> = mesh
            .halfedge_loop(face.inner[0])
            .map(|he| *mesh.position(mesh.origin(he)))
            .collect();
        let hole_normal = newell_normal(&hole);
        assert!(hole_normal.dot(&face.normal) < 0.0);
    }

    #[test]
    fn test_boundary_errors() {
        let err = build_from_boundaries::<u32>(&[]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { .. }));

        let err = build_from_boundaries::<u32>(&[PolyBoundary::hole(square(0.0, 1.0))]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { .. }));

        let err = build_from_boundaries::<u32>(&[PolyBoundary::outer(square(0.0, 1.0)[..2].to_vec())])
            .unwrap_err();
        assert_eq!(err, MeshError::DegenerateBoundary { boundary: 0 });

        let err = build_from_boundaries::<u32>(&[
            PolyBoundary::outer(square(0.0, 1.0)),
            PolyBoundary::outer(square(1.0, 1.0)),
        ])
        .unwrap_err();
        assert_eq!(err, MeshError::DuplicateVertex { boundary: 1, point: 0 });
    }

    #[test]
    fn test_polygons_closed_tetrahedron() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]];

        let mesh: HalfEdgeMesh = build_from_polygons(&positions, &faces).unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert!(!mesh.has_unbounded_face());
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert_eq!(mesh.face_ids().next(), Some(FaceId::new(2)));
        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_polygons_open_strip() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 4, 5], vec![1, 2, 3, 4]];

        let mesh: HalfEdgeMesh = build_from_polygons(&positions, &faces).unwrap();

        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert_eq!(mesh.num_edges(), 7);
        assert_eq!(mesh.face(FaceId::unbounded()).unwrap().inner.len(), 1);
        assert_eq!(mesh.halfedge_loop(mesh.face(FaceId::unbounded()).unwrap().inner[0]).count(), 6);
    }

    #[test]
    fn test_polygon_errors() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert_eq!(
            build_from_polygons::<u32, _>(&positions, &[[0, 1, 5]]).unwrap_err(),
            MeshError::InvalidVertexIndex { face: 0, vertex: 5 }
        );
        assert_eq!(
            build_from_polygons::<u32, _>(&positions, &[[0, 1, 1]]).unwrap_err(),
            MeshError::DegenerateFace { face: 0 }
        );
        assert_eq!(
            build_from_polygons::<u32, _>(&positions, &[[0, 1, 2], [0, 1, 2]]).unwrap_err(),
            MeshError::NonManifoldEdge { v0: 0, v1: 1 }
        );
    }

    #[test]
    fn test_face_vertex_round_trip() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![0, 3, 1], vec![1, 3, 2], vec![2, 3, 0]];
        let mesh: HalfEdgeMesh = build_from_polygons(&positions, &faces).unwrap();

        let (out_positions, out_faces) = face_vertex_lists(&mesh);
        assert_eq!(out_positions, positions);
        assert_eq!(out_faces, faces);
    }
}
