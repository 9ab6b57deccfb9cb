//! Sweep-line status for a top-to-bottom plane sweep.

use nalgebra::Point2;

use super::BinarySearchTree;
use crate::mesh::{HalfEdgeId, MeshIndex, VertexId};

/// An edge currently crossed by the sweep line.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry<I: MeshIndex = u32> {
    /// The half-edge this entry stands for.
    pub halfedge: HalfEdgeId<I>,
    /// Reduced position of the half-edge's origin.
    pub origin: Point2<f64>,
    /// Reduced position of the half-edge's destination.
    pub dest: Point2<f64>,
    /// Lowest vertex above the sweep line that sees this edge.
    pub helper: VertexId<I>,
    /// Whether `helper` is a merge vertex.
    pub is_merge: bool,
}

impl<I: MeshIndex> StatusEntry<I> {
    /// An entry whose helper is not a merge vertex.
    pub fn new(
        halfedge: HalfEdgeId<I>,
        origin: Point2<f64>,
        dest: Point2<f64>,
        helper: VertexId<I>,
    ) -> Self {
        Self {
            halfedge,
            origin,
            dest,
            helper,
            is_merge: false,
        }
    }

    /// X coordinate where the edge's supporting line meets the horizontal
    /// line through `y`. Horizontal edges report their leftmost x.
    pub fn x_at(&self, y: f64) -> f64 {
        let dy = self.dest.y - self.origin.y;
        if dy.abs() < f64::EPSILON {
            return self.origin.x.min(self.dest.x);
        }
        let t = (y - self.origin.y) / dy;
        self.origin.x + t * (self.dest.x - self.origin.x)
    }
}

/// Edges crossing the sweep line, ordered left to right.
///
/// Entries are keyed by their x-intersection with the current sweep line.
/// [`advance`](Self::advance) moves the line and re-keys every entry, which
/// also rebalances the tree.
#[derive(Debug, Clone)]
pub struct SweepLineStatus<I: MeshIndex = u32> {
    tree: BinarySearchTree<f64, StatusEntry<I>>,
    sweep_y: f64,
}

impl<I: MeshIndex> Default for SweepLineStatus<I> {
    fn default() -> Self {
        Self {
            tree: BinarySearchTree::new(),
            sweep_y: f64::INFINITY,
        }
    }
}

impl<I: MeshIndex> SweepLineStatus<I> {
    /// An empty status with the sweep line above everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current height of the sweep line.
    pub fn sweep_y(&self) -> f64 {
        self.sweep_y
    }

    /// Number of edges on the status.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether no edge is on the status.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Move the sweep line to `y` and re-key every entry.
    pub fn advance(&mut self, y: f64) {
        self.sweep_y = y;
        self.tree.rekey(|entry| entry.x_at(y));
        log::trace!("sweep line at y={} crosses {} edges", y, self.tree.len());
    }

    /// Add an edge, keyed at the current sweep line.
    pub fn insert(&mut self, entry: StatusEntry<I>) {
        let key = if self.sweep_y.is_finite() {
            entry.x_at(self.sweep_y)
        } else {
            entry.origin.x.min(entry.dest.x)
        };
        self.tree.insert(key, entry);
    }

    /// Remove the entry for `halfedge`.
    pub fn remove(&mut self, halfedge: HalfEdgeId<I>) -> Option<StatusEntry<I>> {
        self.tree
            .remove_by(|e| e.halfedge == halfedge)
            .map(|(_, entry)| entry)
    }

    /// The entry for `halfedge`.
    pub fn find(&self, halfedge: HalfEdgeId<I>) -> Option<&StatusEntry<I>> {
        self.tree.find_by(|e| e.halfedge == halfedge)
    }

    /// Mutable entry for `halfedge`, e.g. to update its helper.
    pub fn find_mut(&mut self, halfedge: HalfEdgeId<I>) -> Option<&mut StatusEntry<I>> {
        self.tree.find_by_mut(|e| e.halfedge == halfedge)
    }

    /// The nearest edge strictly left of `x` on the sweep line.
    pub fn left_of(&self, x: f64) -> Option<&StatusEntry<I>> {
        self.tree.find_largest_smaller_than(&x).map(|(_, e)| e)
    }

    /// Entries from left to right.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry<I>> + '_ {
        self.tree.values()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn entry(he: usize, from: (f64, f64), to: (f64, f64)) -> StatusEntry {
        StatusEntry::new(
            HalfEdgeId::new(he),
            Point2::new(from.0, from.1),
            Point2::new(to.0, to.1),
            VertexId::new(he),
        )
    }

    #[test]
    fn test_x_at() {
        let e = entry(1, (0.0, 4.0), (4.0, 0.0));
        assert_relative_eq!(e.x_at(4.0), 0.0);
        assert_relative_eq!(e.x_at(1.0), 3.0);

        let flat = entry(2, (3.0, 1.0), (1.0, 1.0));
        assert_relative_eq!(flat.x_at(1.0), 1.0);
    }

    #[test]
    fn test_advance_reorders() {
        let mut status = SweepLineStatus::new();
        status.advance(4.0);
        // Two edges that cross at y = 2
        status.insert(entry(1, (0.0, 4.0), (4.0, 0.0)));
        status.insert(entry(2, (4.0, 4.0), (0.0, 0.0)));
        status.insert(entry(3, (10.0, 4.0), (10.0, 0.0)));

        let order: Vec<usize> = status.iter().map(|e| e.halfedge.index()).collect();
        assert_eq!(order, vec![1, 2, 3]);

        status.advance(1.0);
        let order: Vec<usize> = status.iter().map(|e| e.halfedge.index()).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(status.sweep_y(), 1.0);
    }

    #[test]
    fn test_left_of_and_lookup() {
        let mut status = SweepLineStatus::new();
        status.advance(2.0);
        status.insert(entry(1, (0.0, 4.0), (0.0, 0.0)));
        status.insert(entry(2, (5.0, 4.0), (5.0, 0.0)));
        status.insert(entry(3, (9.0, 4.0), (9.0, 0.0)));

        assert_eq!(status.left_of(6.0).map(|e| e.halfedge.index()), Some(2));
        assert_eq!(status.left_of(5.0).map(|e| e.halfedge.index()), Some(1));
        assert!(status.left_of(0.0).is_none());

        let helper = VertexId::new(42);
        let e = status.find_mut(HalfEdgeId::new(3)).unwrap();
        e.helper = helper;
        e.is_merge = true;
        assert_eq!(status.find(HalfEdgeId::new(3)).unwrap().helper, helper);

        let removed = status.remove(HalfEdgeId::new(2)).unwrap();
        assert_eq!(removed.halfedge.index(), 2);
        assert_eq!(status.len(), 2);
        assert!(status.find(HalfEdgeId::new(2)).is_none());
        assert_eq!(status.left_of(6.0).map(|e| e.halfedge.index()), Some(1));
    }
}
