//! Error types for trellis.
//!
//! Every fallible kernel operation reports one of these variants. Errors are
//! raised synchronously by the operation that first observes the violated
//! precondition; there is no rollback of partially applied edits.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh construction, queries and edits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A vertex, half-edge or face handle is not registered in the mesh.
    #[error("{kind} handle {handle} not found")]
    HandleNotFound {
        /// The element kind ("vertex", "half-edge" or "face").
        kind: &'static str,
        /// The raw handle value.
        handle: usize,
    },

    /// Two vertices fail the adjacency (or non-adjacency) precondition of an edit.
    #[error("vertices {p} and {q}: {reason}")]
    AdjacencyViolation {
        /// First vertex handle.
        p: usize,
        /// Second vertex handle.
        q: usize,
        /// What was expected of the pair.
        reason: &'static str,
    },

    /// Invalid argument value.
    #[error("invalid argument: {name} = {value} ({reason})")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// A polygon boundary has fewer than three points.
    #[error("boundary {boundary} is degenerate (fewer than three points)")]
    DegenerateBoundary {
        /// Index of the boundary in the input slice.
        boundary: usize,
    },

    /// A boundary point coincides with a point that was already placed.
    #[error("boundary {boundary} repeats point {point}")]
    DuplicateVertex {
        /// Index of the boundary in the input slice.
        boundary: usize,
        /// Index of the repeated point within that boundary.
        point: usize,
    },

    /// A face has fewer than three corners or repeats a vertex.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A directed edge is used by more than one face.
    #[error("edge ({v0}, {v1}) is used twice in the same direction")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// Mesh topology is inconsistent.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),
}

impl MeshError {
    /// Create an invalid argument error.
    pub fn invalid_argument<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidArgument {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn adjacency(p: usize, q: usize, reason: &'static str) -> Self {
        MeshError::AdjacencyViolation { p, q, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MeshError::HandleNotFound {
            kind: "vertex",
            handle: 7,
        };
        assert_eq!(err.to_string(), "vertex handle 7 not found");

        let err = MeshError::invalid_argument("offset", 1.5, "must lie in (0, 1)");
        assert_eq!(
            err.to_string(),
            "invalid argument: offset = 1.5 (must lie in (0, 1))"
        );
    }
}
