//! Half-edge mesh container.
//!
//! This module provides the doubly-connected edge list used by every kernel
//! operation. Records live in three arenas indexed directly by handle, so
//! lookups are O(1) and mutation happens in place.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, its **next** and **prev** neighbours
//!   around its face, its **origin vertex**, and its **incident face**
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one outer half-edge and one entry half-edge per hole
//!
//! # Boundaries
//!
//! Open boundaries are closed off by the *unbounded face* (handle 1). Its
//! hole list holds one entry per boundary loop, so every half-edge has a twin
//! and every loop is closed, including the ones around the outside.
//!
//! # Handles
//!
//! Slot 0 of each arena is never used. Removing a record leaves an empty slot
//! behind; its handle is never issued again. The highest handle ever issued
//! per kind is therefore `arena.len() - 1`, which is what mesh merging uses as
//! the renumbering offset.

use nalgebra::{Point3, Vector2, Vector3};

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};
use crate::geometry::newell_normal;

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge, used as the entry point for circulation.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge bounds.
    pub face: FaceId<I>,

    /// Per-corner normal attribute.
    pub normal: Vector3<f64>,

    /// Per-corner texture coordinate attribute.
    pub uv: Vector2<f64>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new unlinked half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            normal: Vector3::zeros(),
            uv: Vector2::zeros(),
        }
    }

    /// Create an unlinked half-edge starting at `origin` and bounding `face`.
    pub fn with_origin(origin: VertexId<I>, face: FaceId<I>) -> Self {
        Self {
            origin,
            face,
            ..Self::new()
        }
    }

    /// Check if this half-edge bounds the unbounded face.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.face.is_unbounded()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the outer boundary. Invalid for the unbounded face.
    pub outer: HalfEdgeId<I>,

    /// One entry half-edge per hole loop.
    pub inner: Vec<HalfEdgeId<I>>,

    /// The face normal.
    pub normal: Vector3<f64>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a face bounded by the loop through `outer`.
    pub fn new(outer: HalfEdgeId<I>) -> Self {
        Self {
            outer,
            inner: Vec::new(),
            normal: Vector3::zeros(),
        }
    }

    /// Create a face with no outer boundary.
    pub fn unbounded() -> Self {
        Self::new(HalfEdgeId::invalid())
    }

    /// Whether the face has at least one hole loop.
    #[inline]
    pub fn has_holes(&self) -> bool {
        !self.inner.is_empty()
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A half-edge mesh with handle-indexed arenas.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Option<Vertex<I>>>,
    pub(crate) halfedges: Vec<Option<HalfEdge<I>>>,
    pub(crate) faces: Vec<Option<Face<I>>>,
    live_vertices: usize,
    live_halfedges: usize,
    live_faces: usize,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: vec![None],
            halfedges: vec![None],
            faces: vec![None],
            live_vertices: 0,
            live_halfedges: 0,
            live_faces: 0,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_halfedges: usize, num_faces: usize) -> Self {
        let mut mesh = Self::new();
        mesh.vertices.reserve(num_vertices);
        mesh.halfedges.reserve(num_halfedges);
        mesh.faces.reserve(num_faces);
        mesh
    }

    // ==================== Counts ====================

    /// Number of live vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.live_vertices
    }

    /// Number of live half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.live_halfedges
    }

    /// Number of live faces, including the unbounded face if present.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.live_faces
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.live_halfedges / 2
    }

    /// Highest vertex handle ever issued (0 if none).
    #[inline]
    pub fn max_vertex_handle(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Highest half-edge handle ever issued (0 if none).
    #[inline]
    pub fn max_halfedge_handle(&self) -> usize {
        self.halfedges.len() - 1
    }

    /// Highest face handle ever issued (0 if none).
    #[inline]
    pub fn max_face_handle(&self) -> usize {
        self.faces.len() - 1
    }

    /// Whether the mesh still carries the unbounded face.
    #[inline]
    pub fn has_unbounded_face(&self) -> bool {
        self.contains_face(FaceId::unbounded())
    }

    // ==================== Fetch by handle ====================

    /// Check whether a vertex handle is live.
    #[inline]
    pub fn contains_vertex(&self, id: VertexId<I>) -> bool {
        matches!(self.vertices.get(id.index()), Some(Some(_)))
    }

    /// Check whether a half-edge handle is live.
    #[inline]
    pub fn contains_halfedge(&self, id: HalfEdgeId<I>) -> bool {
        matches!(self.halfedges.get(id.index()), Some(Some(_)))
    }

    /// Check whether a face handle is live.
    #[inline]
    pub fn contains_face(&self, id: FaceId<I>) -> bool {
        matches!(self.faces.get(id.index()), Some(Some(_)))
    }

    /// Get a vertex by handle.
    pub fn vertex(&self, id: VertexId<I>) -> Result<&Vertex<I>> {
        self.vertices
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(MeshError::HandleNotFound {
                kind: "vertex",
                handle: id.index(),
            })
    }

    /// Get a mutable vertex by handle.
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> Result<&mut Vertex<I>> {
        self.vertices
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::HandleNotFound {
                kind: "vertex",
                handle: id.index(),
            })
    }

    /// Get a half-edge by handle.
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> Result<&HalfEdge<I>> {
        self.halfedges
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(MeshError::HandleNotFound {
                kind: "half-edge",
                handle: id.index(),
            })
    }

    /// Get a mutable half-edge by handle.
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> Result<&mut HalfEdge<I>> {
        self.halfedges
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::HandleNotFound {
                kind: "half-edge",
                handle: id.index(),
            })
    }

    /// Get a face by handle.
    pub fn face(&self, id: FaceId<I>) -> Result<&Face<I>> {
        self.faces
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(MeshError::HandleNotFound {
                kind: "face",
                handle: id.index(),
            })
    }

    /// Get a mutable face by handle.
    pub fn face_mut(&mut self, id: FaceId<I>) -> Result<&mut Face<I>> {
        self.faces
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::HandleNotFound {
                kind: "face",
                handle: id.index(),
            })
    }

    // Infallible record access for handles the topology itself guarantees.

    #[inline]
    pub(crate) fn he(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        match self.halfedges.get(id.index()) {
            Some(Some(he)) => he,
            _ => panic!("dangling half-edge handle {:?}", id),
        }
    }

    #[inline]
    pub(crate) fn he_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        match self.halfedges.get_mut(id.index()) {
            Some(Some(he)) => he,
            _ => panic!("dangling half-edge handle {:?}", id),
        }
    }

    #[inline]
    pub(crate) fn vx(&self, id: VertexId<I>) -> &Vertex<I> {
        match self.vertices.get(id.index()) {
            Some(Some(v)) => v,
            _ => panic!("dangling vertex handle {:?}", id),
        }
    }

    #[inline]
    pub(crate) fn vx_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        match self.vertices.get_mut(id.index()) {
            Some(Some(v)) => v,
            _ => panic!("dangling vertex handle {:?}", id),
        }
    }

    #[inline]
    pub(crate) fn fc(&self, id: FaceId<I>) -> &Face<I> {
        match self.faces.get(id.index()) {
            Some(Some(f)) => f,
            _ => panic!("dangling face handle {:?}", id),
        }
    }

    #[inline]
    pub(crate) fn fc_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        match self.faces.get_mut(id.index()) {
            Some(Some(f)) => f,
            _ => panic!("dangling face handle {:?}", id),
        }
    }

    // ==================== Topology Queries ====================
    //
    // These follow links that a valid mesh always resolves. They panic on a
    // dangling handle, like slice indexing does.

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.he(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.he(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.he(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.he(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.he(he).face
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vx(v).position
    }

    /// Set the position of a vertex.
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) -> Result<()> {
        self.vertex_mut(v)?.position = pos;
        Ok(())
    }

    /// Check if a half-edge bounds the unbounded face.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.he(he).is_boundary()
    }

    /// Check if an edge (represented by one of its half-edges) is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Check if a vertex touches the unbounded face.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_edge(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all live vertex handles in ascending order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices().map(|(id, _)| id)
    }

    /// Iterate over all live vertices with their handles.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (VertexId::new(i), v)))
    }

    /// Iterate over all live half-edge handles in ascending order.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges().map(|(id, _)| id)
    }

    /// Iterate over all live half-edges with their handles.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter_map(|(i, he)| he.as_ref().map(|he| (HalfEdgeId::new(i), he)))
    }

    /// Iterate over all live face handles in ascending order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces().map(|(id, _)| id)
    }

    /// Iterate over all live faces with their handles.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId::new(i), f)))
    }

    /// Iterate over all bounded faces (everything but the unbounded face).
    pub fn bounded_face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.face_ids().filter(|f| !f.is_unbounded())
    }

    /// One half-edge per undirected edge (the one with the smaller handle).
    pub fn edge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges()
            .filter(|(id, he)| *id < he.twin)
            .map(|(id, _)| id)
    }

    // ==================== Construction ====================

    /// Add a new unlinked vertex and return its handle.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Some(Vertex::new(position)));
        self.live_vertices += 1;
        id
    }

    /// Add a half-edge record and return its handle.
    pub fn add_halfedge(&mut self, halfedge: HalfEdge<I>) -> HalfEdgeId<I> {
        let id = HalfEdgeId::new(self.halfedges.len());
        self.halfedges.push(Some(halfedge));
        self.live_halfedges += 1;
        id
    }

    /// Add a face record and return its handle.
    pub fn add_face(&mut self, face: Face<I>) -> FaceId<I> {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Some(face));
        self.live_faces += 1;
        id
    }

    /// Add a twin pair of half-edges, `a -> b` and `b -> a`.
    ///
    /// Only origin and twin links are set. The caller splices next/prev and
    /// assigns faces.
    pub fn add_edge_pair(
        &mut self,
        a: VertexId<I>,
        b: VertexId<I>,
    ) -> (HalfEdgeId<I>, HalfEdgeId<I>) {
        let ab = self.add_halfedge(HalfEdge::with_origin(a, FaceId::invalid()));
        let ba = self.add_halfedge(HalfEdge::with_origin(b, FaceId::invalid()));
        self.he_mut(ab).twin = ba;
        self.he_mut(ba).twin = ab;
        (ab, ba)
    }

    /// Link `a.next = b` and `b.prev = a`.
    #[inline]
    pub fn link(&mut self, a: HalfEdgeId<I>, b: HalfEdgeId<I>) {
        self.he_mut(a).next = b;
        self.he_mut(b).prev = a;
    }

    /// Set the incident face of every half-edge on the loop through `start`.
    pub fn assign_loop_face(&mut self, start: HalfEdgeId<I>, face: FaceId<I>) {
        let members: Vec<_> = self.halfedge_loop(start).collect();
        for he in members {
            self.he_mut(he).face = face;
        }
    }

    /// Place a record at an explicit handle, growing the arena as needed.
    pub(crate) fn place_vertex(&mut self, id: VertexId<I>, vertex: Vertex<I>) {
        let slot = id.index();
        if self.vertices.len() <= slot {
            self.vertices.resize(slot + 1, None);
        }
        if self.vertices[slot].replace(vertex).is_none() {
            self.live_vertices += 1;
        }
    }

    pub(crate) fn place_halfedge(&mut self, id: HalfEdgeId<I>, halfedge: HalfEdge<I>) {
        let slot = id.index();
        if self.halfedges.len() <= slot {
            self.halfedges.resize(slot + 1, None);
        }
        if self.halfedges[slot].replace(halfedge).is_none() {
            self.live_halfedges += 1;
        }
    }

    pub(crate) fn place_face(&mut self, id: FaceId<I>, face: Face<I>) {
        let slot = id.index();
        if self.faces.len() <= slot {
            self.faces.resize(slot + 1, None);
        }
        if self.faces[slot].replace(face).is_none() {
            self.live_faces += 1;
        }
    }

    // ==================== Removal ====================

    /// Remove a vertex. The handle is retired, never reissued.
    pub fn remove_vertex(&mut self, id: VertexId<I>) -> Result<Vertex<I>> {
        self.vertex(id)?;
        self.live_vertices -= 1;
        self.vertices[id.index()]
            .take()
            .ok_or(MeshError::InvalidState(format!("{:?} vanished", id)))
    }

    /// Remove a half-edge. The handle is retired, never reissued.
    pub fn remove_halfedge(&mut self, id: HalfEdgeId<I>) -> Result<HalfEdge<I>> {
        self.halfedge(id)?;
        self.live_halfedges -= 1;
        self.halfedges[id.index()]
            .take()
            .ok_or(MeshError::InvalidState(format!("{:?} vanished", id)))
    }

    /// Remove a face. The handle is retired, never reissued.
    ///
    /// Half-edges still pointing at the face are left for the caller to fix.
    pub fn remove_face(&mut self, id: FaceId<I>) -> Result<Face<I>> {
        self.face(id)?;
        self.live_faces -= 1;
        self.faces[id.index()]
            .take()
            .ok_or(MeshError::InvalidState(format!("{:?} vanished", id)))
    }

    // ==================== Geometry ====================

    /// The stored normal of a face.
    pub fn face_normal(&self, f: FaceId<I>) -> Result<Vector3<f64>> {
        Ok(self.face(f)?.normal)
    }

    /// Compute a face's normal from its outer boundary using Newell's method.
    pub fn compute_face_normal(&self, f: FaceId<I>) -> Result<Vector3<f64>> {
        self.face(f)?;
        let points: Vec<Point3<f64>> = self
            .face_outer_vertices(f)
            .map(|v| *self.position(v))
            .collect();
        Ok(newell_normal(&points))
    }

    /// Recompute one face's normal and copy it onto its outer half-edges.
    pub fn update_face_normal(&mut self, f: FaceId<I>) -> Result<Vector3<f64>> {
        self.face(f)?;
        Ok(self.refresh_normal(f))
    }

    /// Store `normal` on a face and on its half-edges without recomputing it.
    pub fn set_face_normal(&mut self, f: FaceId<I>, normal: Vector3<f64>) -> Result<()> {
        self.face(f)?;
        self.store_normal(f, normal);
        Ok(())
    }

    /// Recompute every bounded face normal and copy it onto the face's
    /// half-edges as a flat-shaded corner normal.
    pub fn recompute_normals(&mut self) {
        let faces: Vec<_> = self.bounded_face_ids().collect();
        for f in faces {
            self.refresh_normal(f);
        }
    }

    fn refresh_normal(&mut self, f: FaceId<I>) -> Vector3<f64> {
        let points: Vec<Point3<f64>> = self
            .face_outer_vertices(f)
            .map(|v| *self.position(v))
            .collect();
        let normal = newell_normal(&points);
        self.store_normal(f, normal);
        normal
    }

    fn store_normal(&mut self, f: FaceId<I>, normal: Vector3<f64>) {
        self.fc_mut(f).normal = normal;
        let loop_members: Vec<_> = self.face_halfedges(f).collect();
        for he in loop_members {
            self.he_mut(he).normal = normal;
        }
    }

    /// Mean position of a face's outer boundary vertices.
    pub fn face_centroid(&self, f: FaceId<I>) -> Result<Point3<f64>> {
        let face = self.face(f)?;
        if !face.outer.is_valid() {
            return Err(MeshError::invalid_argument(
                "face",
                f,
                "the unbounded face has no centroid",
            ));
        }
        let positions: Vec<Point3<f64>> = self
            .face_outer_vertices(f)
            .map(|v| *self.position(v))
            .collect();
        crate::geometry::mean_position(&positions)
    }

    /// Number of outgoing half-edges of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Compute the length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        (self.position(self.dest(he)) - self.position(self.origin(he))).norm()
    }

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, he: HalfEdgeId<I>) -> Point3<f64> {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        Point3::from((p0.coords + p1.coords) * 0.5)
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.vertices().map(|(_, v)| v.position);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(mut min, mut max), p| {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
            (min, max)
        }))
    }

    /// Euler characteristic `V - E + F`, counting only bounded faces.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64
            + self.bounded_face_ids().count() as i64
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every structural invariant and report the first violation.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(MeshError::InvalidState(msg));

        for (vid, v) in self.vertices() {
            match self.halfedges.get(v.halfedge.index()).and_then(Option::as_ref) {
                Some(he) if he.origin == vid => {}
                Some(_) => return bad(format!("{:?} entry {:?} starts elsewhere", vid, v.halfedge)),
                None => return bad(format!("{:?} has no outgoing half-edge", vid)),
            }
        }

        for (id, he) in self.halfedges() {
            if !self.contains_vertex(he.origin) {
                return bad(format!("{:?} origin {:?} missing", id, he.origin));
            }
            if !self.contains_face(he.face) {
                return bad(format!("{:?} face {:?} missing", id, he.face));
            }
            let twin = match self.halfedges.get(he.twin.index()).and_then(Option::as_ref) {
                Some(t) => t,
                None => return bad(format!("{:?} twin {:?} missing", id, he.twin)),
            };
            if he.twin == id || twin.twin != id {
                return bad(format!("{:?} and {:?} are not mutual twins", id, he.twin));
            }
            if he.face.is_unbounded() && twin.face.is_unbounded() {
                return bad(format!("edge {:?} lies in the unbounded face twice", id));
            }
            match self.halfedges.get(he.next.index()).and_then(Option::as_ref) {
                Some(n) if n.prev == id => {
                    if n.origin != twin.origin {
                        return bad(format!("{:?} does not end where {:?} starts", id, he.next));
                    }
                }
                _ => return bad(format!("next/prev of {:?} are inconsistent", id)),
            }
            match self.halfedges.get(he.prev.index()).and_then(Option::as_ref) {
                Some(p) if p.next == id => {}
                _ => return bad(format!("prev/next of {:?} are inconsistent", id)),
            }
        }

        let mut covered = 0usize;
        for (fid, face) in self.faces() {
            if fid.is_unbounded() == face.outer.is_valid() {
                return bad(format!("{:?} outer boundary does not match its kind", fid));
            }
            let entries = face.outer.is_valid().then_some(face.outer);
            for start in entries.into_iter().chain(face.inner.iter().copied()) {
                let mut he = start;
                let mut steps = 0usize;
                loop {
                    match self.halfedges.get(he.index()).and_then(Option::as_ref) {
                        Some(rec) if rec.face == fid => he = rec.next,
                        _ => return bad(format!("loop of {:?} leaves the face at {:?}", fid, he)),
                    }
                    steps += 1;
                    if he == start {
                        break;
                    }
                    if steps > self.live_halfedges {
                        return bad(format!("loop of {:?} never closes", fid));
                    }
                }
                covered += steps;
            }
        }
        if covered != self.live_halfedges {
            return bad(format!(
                "face loops cover {} of {} half-edges",
                covered, self.live_halfedges
            ));
        }

        Ok(())
    }
}
