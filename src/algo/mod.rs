//! Mesh operations built on the half-edge kernel.
//!
//! - **Editing**: edge splits, diagonals, face insets
//! - **Extrusion**: planar outlines into solids, single faces outwards
//! - **Subdivision**: Catmull-Clark
//!
//! All operations work in place on a [`HalfEdgeMesh`](crate::mesh::HalfEdgeMesh)
//! and report precondition failures as [`MeshError`](crate::error::MeshError).

pub mod edit;
pub mod extrude;
pub mod progress;
pub mod subdivide;

pub use progress::Progress;
