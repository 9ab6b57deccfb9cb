//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation (a doubly-connected
//! edge list) used by every kernel operation.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`]. Faces are arbitrary polygons and may
//! carry holes; open boundaries are closed by a distinguished unbounded face
//! so that every half-edge has a twin.
//!
//! # Handle Types
//!
//! Mesh elements are identified by type-safe handles:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! Handles are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Planar outlines go through [`build_from_boundaries`]; closed or open
//! polygon soups go through [`build_from_polygons`]:
//!
//! ```
//! use trellis::mesh::{build_from_boundaries, HalfEdgeMesh, PolyBoundary};
//! use nalgebra::Point3;
//!
//! let outline = PolyBoundary::outer(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ]);
//!
//! let mesh: HalfEdgeMesh = build_from_boundaries(&[outline]).unwrap();
//! assert!(mesh.is_valid());
//! ```

mod builder;
mod circulate;
mod halfedge;
mod index;
mod merge;

pub use builder::{build_from_boundaries, build_from_polygons, face_vertex_lists, PolyBoundary};
pub use circulate::{HalfEdgeLoopIter, VertexHalfEdgeIter};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use merge::HandleOffsets;
