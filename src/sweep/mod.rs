//! Plane-sweep support for monotone polygon decomposition.
//!
//! - [`BinarySearchTree`]: key-ordered tree with explicit rebalancing
//! - [`SweepLineStatus`]: the edges currently crossed by a horizontal sweep
//!   line, ordered by where they cross it
//! - [`classify_vertex`], [`sorted_events`] and [`is_monotone`]: event
//!   handling in a face's reduced 2D frame
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::sweep::{classify_vertex, VertexType};
//! use nalgebra::Point3;
//!
//! let notch = PolyBoundary::outer(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 2.0, 0.0),
//!     Point3::new(3.0, 0.0, 0.0),
//!     Point3::new(4.0, 0.0, 0.0),
//!     Point3::new(4.0, 4.0, 0.0),
//!     Point3::new(0.0, 4.0, 0.0),
//! ]);
//! let mesh: HalfEdgeMesh = build_from_boundaries(&[notch]).unwrap();
//!
//! let tip = classify_vertex(&mesh, FaceId::new(2), VertexId::new(3)).unwrap();
//! assert_eq!(tip, VertexType::Split);
//! ```

mod bst;
mod status;
mod vertex_type;

pub use bst::{BinarySearchTree, Inorder, Node, Preorder};
pub use status::{StatusEntry, SweepLineStatus};
pub use vertex_type::{classify_vertex, is_monotone, sorted_events, VertexType};
