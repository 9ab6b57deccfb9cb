//! Handle renumbering, winding reversal and mesh merging.
//!
//! These are the building blocks of polygon extrusion: a copy of the mesh is
//! reversed, shifted past the original's handles, and absorbed into it.

use super::halfedge::{Face, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Amount added to each kind of handle by [`HalfEdgeMesh::offset_handles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleOffsets {
    /// Added to every vertex handle.
    pub vertices: usize,
    /// Added to every half-edge handle.
    pub halfedges: usize,
    /// Added to every face handle.
    pub faces: usize,
}

impl HandleOffsets {
    /// Offsets that move a second mesh past every handle `mesh` has issued.
    pub fn past<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        Self {
            vertices: mesh.max_vertex_handle(),
            halfedges: mesh.max_halfedge_handle(),
            faces: mesh.max_face_handle(),
        }
    }
}

/// Insert `by` empty slots right after the reserved slot 0.
fn shift_arena<T>(arena: &mut Vec<Option<T>>, by: usize) {
    arena.splice(1..1, std::iter::repeat_with(|| None).take(by));
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Renumber every handle by a per-kind offset.
    ///
    /// Records move to their new slots and every stored reference is shifted
    /// with them. Invalid references stay invalid.
    pub fn offset_handles(&mut self, offsets: HandleOffsets) {
        shift_arena(&mut self.vertices, offsets.vertices);
        shift_arena(&mut self.halfedges, offsets.halfedges);
        shift_arena(&mut self.faces, offsets.faces);

        for v in self.vertices.iter_mut().flatten() {
            v.halfedge = v.halfedge.offset(offsets.halfedges);
        }
        for he in self.halfedges.iter_mut().flatten() {
            he.origin = he.origin.offset(offsets.vertices);
            he.twin = he.twin.offset(offsets.halfedges);
            he.next = he.next.offset(offsets.halfedges);
            he.prev = he.prev.offset(offsets.halfedges);
            he.face = he.face.offset(offsets.faces);
        }
        for f in self.faces.iter_mut().flatten() {
            f.outer = f.outer.offset(offsets.halfedges);
            for entry in f.inner.iter_mut() {
                *entry = entry.offset(offsets.halfedges);
            }
        }

        log::trace!("offset handles by {:?}", offsets);
    }

    /// Reverse the orientation of every loop.
    ///
    /// Each half-edge swaps `next` and `prev` and takes its old destination as
    /// its origin, so it keeps its twin and its face but runs the other way.
    /// Face normals are recomputed afterwards.
    pub fn reverse_winding(&mut self) {
        let dests: Vec<(HalfEdgeId<I>, VertexId<I>)> =
            self.halfedge_ids().map(|he| (he, self.dest(he))).collect();

        for (he, dest) in dests {
            let rec = self.he_mut(he);
            std::mem::swap(&mut rec.next, &mut rec.prev);
            rec.origin = dest;
        }

        // The old entry half-edge now ends at its vertex; its twin starts there.
        let entries: Vec<(VertexId<I>, HalfEdgeId<I>)> = self
            .vertices()
            .filter(|(_, v)| v.halfedge.is_valid())
            .map(|(id, v)| (id, self.twin(v.halfedge)))
            .collect();
        for (v, he) in entries {
            self.vx_mut(v).halfedge = he;
        }

        self.recompute_normals();
    }

    /// Move every record of `other` into this mesh.
    ///
    /// `other` must already be renumbered past this mesh's handles (see
    /// [`HandleOffsets::past`]). Its unbounded face is folded into face 1:
    /// the half-edges that bounded it are reassigned and its hole entries are
    /// appended to face 1's list. Returns those appended entries.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidState`] if a handle of `other` is already in use.
    pub fn absorb(&mut self, mut other: HalfEdgeMesh<I>) -> Result<Vec<HalfEdgeId<I>>> {
        if let Some(v) = other.vertex_ids().find(|&v| self.contains_vertex(v)) {
            return Err(MeshError::InvalidState(format!("{:?} exists in both meshes", v)));
        }
        if let Some(he) = other.halfedge_ids().find(|&he| self.contains_halfedge(he)) {
            return Err(MeshError::InvalidState(format!("{:?} exists in both meshes", he)));
        }
        if let Some(f) = other.face_ids().find(|&f| self.contains_face(f)) {
            return Err(MeshError::InvalidState(format!("{:?} exists in both meshes", f)));
        }

        let unbounded = FaceId::unbounded();
        let folded = other
            .faces()
            .find(|(_, f)| !f.outer.is_valid())
            .map(|(id, _)| id);

        let mut entries = Vec::new();
        if let Some(outside) = folded {
            let face = other.remove_face(outside)?;
            for he in other.halfedges.iter_mut().flatten() {
                if he.face == outside {
                    he.face = unbounded;
                }
            }
            if !self.contains_face(unbounded) {
                self.place_face(unbounded, Face::unbounded());
            }
            self.fc_mut(unbounded).inner.extend(face.inner.iter().copied());
            entries = face.inner;
        }

        for (i, v) in other.vertices.into_iter().enumerate() {
            if let Some(v) = v {
                self.place_vertex(VertexId::new(i), v);
            }
        }
        for (i, he) in other.halfedges.into_iter().enumerate() {
            if let Some(he) = he {
                self.place_halfedge(HalfEdgeId::new(i), he);
            }
        }
        for (i, f) in other.faces.into_iter().enumerate() {
            if let Some(f) = f {
                self.place_face(FaceId::new(i), f);
            }
        }

        log::debug!(
            "absorbed mesh: now {} vertices, {} half-edges, {} faces",
            self.num_vertices(),
            self.num_halfedges(),
            self.num_faces()
        );

        Ok(entries)
    }
}
