//! # Trellis
//!
//! A half-edge (doubly-connected edge list) geometry kernel for polygon
//! meshes with holes.
//!
//! Trellis keeps vertices, half-edges and faces in handle-indexed arenas and
//! offers the topological surgery needed to model with them: splitting
//! edges, inserting diagonals, insetting and extruding faces, generating
//! primitive solids and refining them with Catmull-Clark subdivision.
//!
//! ## Features
//!
//! - **Half-edge data structure**: stable, never-reused handles with
//!   16-, 32- or 64-bit backing integers
//! - **Faces with holes**: every face has one outer loop and any number of
//!   inner loops; open boundaries belong to a distinguished unbounded face
//! - **Planar predicates**: Newell normals, 2D reduction, point-in-polygon,
//!   angle and winding tests
//! - **Editing**: edge splits, diagonals, face insets, extrusion
//! - **Primitives**: cuboid, UV sphere, cone, pyramid
//! - **Subdivision**: Catmull-Clark for faces of any degree
//!
//! ## Quick Start
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::algo::extrude::extrude_polygon;
//! use nalgebra::Point3;
//!
//! // A square with a square hole
//! let outer = PolyBoundary::outer(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(4.0, 0.0, 0.0),
//!     Point3::new(4.0, 4.0, 0.0),
//!     Point3::new(0.0, 4.0, 0.0),
//! ]);
//! let hole = PolyBoundary::hole(vec![
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(3.0, 1.0, 0.0),
//!     Point3::new(3.0, 3.0, 0.0),
//!     Point3::new(1.0, 3.0, 0.0),
//! ]);
//!
//! let mut mesh: HalfEdgeMesh = build_from_boundaries(&[outer, hole]).unwrap();
//! assert_eq!(mesh.face(FaceId::new(2)).unwrap().inner.len(), 1);
//!
//! // Turn it into a solid frame
//! extrude_polygon(&mut mesh, 1.0, false).unwrap();
//! assert!(!mesh.has_unbounded_face());
//! assert!(mesh.is_valid());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::primitives::cuboid;
//!
//! let mesh: HalfEdgeMesh = cuboid(1.0, 1.0, 1.0).unwrap();
//!
//! // Iterate over neighbors of a vertex
//! let v = VertexId::new(1);
//! assert_eq!(mesh.vertex_neighbors(v).count(), 3);
//!
//! // Walk the boundary of a face
//! for face in mesh.bounded_face_ids() {
//!     let corners: Vec<_> = mesh.face_vertices(face).collect();
//!     assert_eq!(corners.len(), 4);
//! }
//! ```
//!
//! ## Logging
//!
//! Operations report through the [`log`] facade: `debug!` once per
//! operation, `trace!` per element, `warn!` for degenerate geometry. No
//! logger is installed by the library.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod primitives;
pub mod sweep;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_boundaries, build_from_polygons, face_vertex_lists, Face, FaceId, HalfEdge,
        HalfEdgeId, HalfEdgeMesh, MeshIndex, PolyBoundary, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
