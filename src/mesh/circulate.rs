//! Circulators over the half-edge structure.
//!
//! All iterators here are lazy and borrow the mesh. They follow links
//! without checking them, so they assume a valid mesh; run
//! [`HalfEdgeMesh::validate`] first when that is in doubt.

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// Iterator over the outgoing half-edges of a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vx(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // twin(he) ends at v, so the half-edge after it starts at v again.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator around one closed half-edge loop, forwards or backwards.
pub struct HalfEdgeLoopIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    reverse: bool,
    done: bool,
}

impl<'a, I: MeshIndex> HalfEdgeLoopIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, start: HalfEdgeId<I>, reverse: bool) -> Self {
        Self {
            mesh,
            start,
            current: start,
            reverse,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for HalfEdgeLoopIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = if self.reverse {
            self.mesh.prev(self.current)
        } else {
            self.mesh.next(self.current)
        };

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Iterate over half-edges leaving a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over half-edges arriving at a vertex.
    pub fn vertex_incoming_halfedges(&self, v: VertexId<I>) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.twin(he))
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over bounded faces around a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v)
            .map(|he| self.face_of(he))
            .filter(|f| !f.is_unbounded())
    }

    /// Check whether two vertices share an edge.
    pub fn are_adjacent(&self, p: VertexId<I>, q: VertexId<I>) -> bool {
        self.find_halfedge(p, q).is_some()
    }

    /// Find the half-edge running from `p` to `q`, if any.
    pub fn find_halfedge(&self, p: VertexId<I>, q: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(p).find(|&he| self.dest(he) == q)
    }

    /// Find the half-edge leaving `v` that bounds `face`.
    pub fn halfedge_in_face(&self, v: VertexId<I>, face: FaceId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(v).find(|&he| self.face_of(he) == face)
    }

    /// Walk the loop through `he` following `next`.
    pub fn halfedge_loop(&self, he: HalfEdgeId<I>) -> HalfEdgeLoopIter<'_, I> {
        HalfEdgeLoopIter::new(self, he, false)
    }

    /// Walk the loop through `he` following `prev`.
    pub fn halfedge_loop_rev(&self, he: HalfEdgeId<I>) -> HalfEdgeLoopIter<'_, I> {
        HalfEdgeLoopIter::new(self, he, true)
    }

    /// Iterate over the outer boundary half-edges of a face.
    ///
    /// Empty for the unbounded face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> HalfEdgeLoopIter<'_, I> {
        self.halfedge_loop(self.fc(f).outer)
    }

    /// Iterate over the outer boundary vertices of a face.
    pub fn face_outer_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Entry half-edges of every loop of a face: the outer one first, then holes.
    pub fn face_loops(&self, f: FaceId<I>) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        let face = self.fc(f);
        face.outer
            .is_valid()
            .then_some(face.outer)
            .into_iter()
            .chain(face.inner.iter().copied())
    }

    /// Every half-edge of a face: the outer loop, then each hole loop.
    pub fn face_all_halfedges(&self, f: FaceId<I>) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.face_loops(f).flat_map(move |start| self.halfedge_loop(start))
    }

    /// Every vertex of a face: outer boundary first, then each hole.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_all_halfedges(f).map(|he| self.origin(he))
    }

    /// Faces across each outer boundary edge of `f`.
    pub fn face_neighbors(&self, f: FaceId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.face_of(self.twin(he)))
    }

    /// Number of outer boundary edges of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }
}
