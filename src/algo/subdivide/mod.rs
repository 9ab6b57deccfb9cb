//! Mesh subdivision.
//!
//! # Catmull-Clark Subdivision
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) is an approximating
//! scheme for polygon meshes of any face degree. Each iteration:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates an edge point from both edge endpoints and both adjacent
//!    face points
//! 3. Moves each original vertex to a weighted average of its old
//!    position, the surrounding face points and the surrounding edge points
//! 4. Replaces every k-sided face with k quads
//!
//! After one iteration every bounded face is a quad.
//!
//! Open meshes keep their border: edges next to the unbounded face split at
//! their midpoint and border vertices do not move.
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
//! use trellis::primitives::cuboid;
//!
//! let mut mesh: HalfEdgeMesh = cuboid(1.0, 1.0, 1.0).unwrap();
//!
//! let options = SubdivideOptions::new(2); // 2 iterations
//! catmull_clark_subdivide(&mut mesh, &options).unwrap();
//!
//! assert_eq!(mesh.num_faces(), 6 * 16);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;

pub use catmull_clark::{catmull_clark_subdivide, catmull_clark_subdivide_with_progress};

/// Options for subdivision algorithms.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Whether to compute new positions in parallel (default: true).
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
