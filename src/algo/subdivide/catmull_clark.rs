//! Catmull-Clark subdivision on the half-edge structure.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::edit::split_halfedge;
use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

use super::SubdivideOptions;

/// Performs Catmull-Clark subdivision in place.
///
/// Faces of any degree are accepted; each iteration replaces a k-sided face
/// by k quads, reusing the face's handle for the first of them. Original
/// vertices keep their handles.
///
/// # Vertex Rules
///
/// - **Face point**: centroid of the face's vertices
/// - **Edge point**: `(p0 + p1 + f0 + f1) / 4`, or the edge midpoint when
///   one side is the unbounded face
/// - **Vertex point**: `(F + 2R + (n-3)P) / n` where:
///   - F = average of the face points around the vertex
///   - R = average of the edge points around the vertex
///   - P = original position
///   - n = number of outgoing half-edges
///
/// Vertices on the border of an open mesh keep their position.
///
/// # Errors
///
/// [`MeshError::InvalidArgument`] if a bounded face has holes. The mesh is
/// left untouched in that case.
pub fn catmull_clark_subdivide<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
) -> Result<()> {
    catmull_clark_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Catmull-Clark subdivision with progress reporting.
pub fn catmull_clark_subdivide_with_progress<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<()> {
    if options.iterations == 0 {
        return Ok(());
    }

    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Catmull-Clark subdivision");
        *mesh = catmull_clark_subdivide_once(mesh, options.parallel)?;
    }
    progress.report(options.iterations, options.iterations, "Catmull-Clark subdivision");

    log::debug!(
        "Catmull-Clark x{}: {} vertices, {} faces",
        options.iterations,
        mesh.num_vertices(),
        mesh.num_faces()
    );

    Ok(())
}

/// Perform one iteration, returning the refined mesh.
fn catmull_clark_subdivide_once<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    parallel: bool,
) -> Result<HalfEdgeMesh<I>> {
    let faces: Vec<FaceId<I>> = mesh.bounded_face_ids().collect();
    if let Some(&holed) = faces.iter().find(|&&f| mesh.fc(f).has_holes()) {
        return Err(MeshError::invalid_argument(
            "mesh",
            holed,
            "faces with holes cannot be subdivided",
        ));
    }

    // Step 1: Face points
    let face_points: HashMap<FaceId<I>, Point3<f64>> = if parallel {
        faces
            .par_iter()
            .map(|&f| mesh.face_centroid(f).map(|c| (f, c)))
            .collect::<Result<_>>()?
    } else {
        faces
            .iter()
            .map(|&f| mesh.face_centroid(f).map(|c| (f, c)))
            .collect::<Result<_>>()?
    };

    // Step 2: Edge points, keyed by the smaller half-edge of each pair
    let edges: Vec<HalfEdgeId<I>> = mesh.edge_ids().collect();
    let edge_points: HashMap<HalfEdgeId<I>, Point3<f64>> = edges
        .iter()
        .map(|&he| (he, edge_point(mesh, he, &face_points)))
        .collect();

    // Step 3: Updated positions of the original vertices
    let vertices: Vec<VertexId<I>> = mesh.vertex_ids().collect();
    let updated: Vec<Point3<f64>> = if parallel {
        vertices
            .par_iter()
            .map(|&v| vertex_point(mesh, v, &face_points, &edge_points))
            .collect()
    } else {
        vertices
            .iter()
            .map(|&v| vertex_point(mesh, v, &face_points, &edge_points))
            .collect()
    };

    // Step 4: Split every edge, then fan every face into quads
    let mut refined = mesh.clone();
    for (&v, &pos) in vertices.iter().zip(&updated) {
        refined.vx_mut(v).position = pos;
    }
    for &he in &edges {
        split_halfedge(&mut refined, he, edge_points[&he]);
    }
    for &f in &faces {
        fan_into_quads(&mut refined, f, face_points[&f]);
    }
    refined.recompute_normals();

    log::trace!(
        "Catmull-Clark step: {} faces, {} edges -> {} faces",
        faces.len(),
        edges.len(),
        refined.bounded_face_ids().count()
    );

    Ok(refined)
}

fn canonical<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
    he.min(mesh.twin(he))
}

fn edge_point<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    he: HalfEdgeId<I>,
    face_points: &HashMap<FaceId<I>, Point3<f64>>,
) -> Point3<f64> {
    let twin = mesh.twin(he);
    let p0 = mesh.position(mesh.origin(he)).coords;
    let p1 = mesh.position(mesh.origin(twin)).coords;
    match (
        face_points.get(&mesh.face_of(he)),
        face_points.get(&mesh.face_of(twin)),
    ) {
        (Some(f0), Some(f1)) => Point3::from((p0 + p1 + f0.coords + f1.coords) / 4.0),
        _ => Point3::from((p0 + p1) * 0.5),
    }
}

fn vertex_point<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
    face_points: &HashMap<FaceId<I>, Point3<f64>>,
    edge_points: &HashMap<HalfEdgeId<I>, Point3<f64>>,
) -> Point3<f64> {
    let pos = *mesh.position(v);
    if mesh.is_boundary_vertex(v) {
        return pos;
    }

    let mut f = Vector3::<f64>::zeros();
    let mut r = Vector3::<f64>::zeros();
    let mut n = 0usize;
    for he in mesh.vertex_halfedges(v) {
        if let Some(fp) = face_points.get(&mesh.face_of(he)) {
            f += fp.coords;
        }
        if let Some(ep) = edge_points.get(&canonical(mesh, he)) {
            r += ep.coords;
        }
        n += 1;
    }
    if n == 0 {
        return pos;
    }

    let n_f = n as f64;
    Point3::from((f / n_f + r / n_f * 2.0 + pos.coords * (n_f - 3.0)) / n_f)
}

/// Replace a face whose edges were all split by one quad per original
/// corner around a new center vertex.
///
/// Starting at the face's outer half-edge, the loop alternates between
/// half-edges leaving an original corner and half-edges leaving an edge
/// point. Quad `m` is `E(m-1) -> v(m) -> E(m) -> c`.
fn fan_into_quads<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, face: FaceId<I>, center: Point3<f64>) {
    let ring: Vec<HalfEdgeId<I>> = mesh.face_halfedges(face).collect();
    let k = ring.len() / 2;
    let c = mesh.add_vertex(center);

    // spokes[m] = (E(m) -> c, c -> E(m-1))
    let mut spokes: Vec<(HalfEdgeId<I>, HalfEdgeId<I>)> = Vec::with_capacity(k);
    for m in 0..k {
        let arriving = ring[(2 * m + 2 * k - 1) % (2 * k)];
        let leaving = ring[2 * m];
        let edge_next = mesh.dest(leaving);

        let quad = if m == 0 { face } else { mesh.add_face(Face::new(leaving)) };
        let inward = mesh.add_halfedge(HalfEdge::with_origin(edge_next, quad));
        let outward = mesh.add_halfedge(HalfEdge::with_origin(c, quad));

        mesh.link(arriving, leaving);
        mesh.link(leaving, inward);
        mesh.link(inward, outward);
        mesh.link(outward, arriving);
        mesh.assign_loop_face(leaving, quad);

        spokes.push((inward, outward));
    }
    mesh.fc_mut(face).outer = ring[0];

    for m in 0..k {
        let inward = spokes[m].0;
        let outward = spokes[(m + 1) % k].1;
        mesh.he_mut(inward).twin = outward;
        mesh.he_mut(outward).twin = inward;
    }
    mesh.vx_mut(c).halfedge = spokes[0].1;
}
