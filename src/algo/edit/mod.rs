//! Structural mesh edits.
//!
//! Each operation validates its arguments through the fallible accessors
//! before it touches the mesh, then rewires the half-edge links in place.
//! Operations are not transactional: an error raised after mutation has
//! begun leaves the mesh as it was at that point.
//!
//! - [`insert_vertex`]: split an edge at a new vertex
//! - [`insert_diagonal`]: connect two vertices of a face, splitting the face
//!   or merging a hole into its outer boundary
//! - [`inset_face`]: shrink a face towards its centroid, surrounded by a ring
//!   of quads
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::algo::edit::{insert_diagonal, insert_vertex};
//! use nalgebra::Point3;
//!
//! let square = PolyBoundary::outer(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//! let mut mesh: HalfEdgeMesh = build_from_boundaries(&[square]).unwrap();
//!
//! let mid = insert_vertex(&mut mesh, VertexId::new(1), VertexId::new(2), Point3::new(0.5, 0.0, 0.0)).unwrap();
//! let split = insert_diagonal(&mut mesh, mid, VertexId::new(4)).unwrap();
//! assert!(split.is_some());
//! assert!(mesh.is_valid());
//! ```

mod diagonal;
mod inset;
mod insert;

pub use diagonal::insert_diagonal;
pub use inset::inset_face;
pub use insert::insert_vertex;
pub(crate) use insert::split_halfedge;
