//! An unbalanced binary search tree with on-demand rebalancing.

use std::cmp::Ordering;

/// A tree node. Keys smaller than or equal to `key` live on the left.
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    /// Sort key.
    pub key: K,
    /// Payload.
    pub value: V,
    left: Option<Box<Node<K, V>>>,
    right: Option<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }

    /// Left subtree.
    pub fn left(&self) -> Option<&Node<K, V>> {
        self.left.as_deref()
    }

    /// Right subtree.
    pub fn right(&self) -> Option<&Node<K, V>> {
        self.right.as_deref()
    }
}

/// Key-ordered binary search tree.
///
/// Duplicate keys are allowed and sent to the left. The tree is not
/// self-balancing; [`balance`](Self::balance) rebuilds it from an in-order
/// snapshot so that every subtree splits around its middle entry.
///
/// # Example
///
/// ```
/// use trellis::sweep::BinarySearchTree;
///
/// let mut tree = BinarySearchTree::new();
/// for (k, v) in [(5, 'e'), (2, 'b'), (8, 'h'), (1, 'a')] {
///     tree.insert(k, v);
/// }
///
/// assert_eq!(tree.find(&8), Some(&'h'));
/// assert_eq!(tree.min(), Some((&1, &'a')));
/// assert_eq!(tree.find_largest_smaller_than(&5), Some((&2, &'b')));
/// assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2, 5, 8]);
/// ```
#[derive(Debug, Clone)]
pub struct BinarySearchTree<K, V> {
    root: Option<Box<Node<K, V>>>,
    len: usize,
}

impl<K, V> Default for BinarySearchTree<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

// Sorted insertion builds a chain as deep as the tree is long, so nodes are
// released from an explicit stack instead of by recursive drops.
impl<K, V> Drop for BinarySearchTree<K, V> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<K: PartialOrd, V> BinarySearchTree<K, V> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// Insert an entry. Equal keys go to the left of existing ones.
    pub fn insert(&mut self, key: K, value: V) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if key <= node.key {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Node::leaf(key, value));
        self.len += 1;
    }

    /// Remove one entry with `key`, replacing an inner node by its in-order
    /// successor. Returns the removed value.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let removed = delete_from(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Value stored under `key`.
    pub fn find(&self, key: &K) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.partial_cmp(&node.key)? {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Mutable value stored under `key`.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match key.partial_cmp(&node.key)? {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            };
        }
        None
    }

    /// The entry with the smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// The entry with the largest key strictly smaller than `key`.
    pub fn find_largest_smaller_than(&self, key: &K) -> Option<(&K, &V)> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if node.key < *key {
                best = Some((&node.key, &node.value));
                current = node.right();
            } else {
                current = node.left();
            }
        }
        best
    }

    /// Rebuild the tree so each subtree is rooted at the middle of its
    /// in-order range.
    pub fn balance(&mut self) {
        let entries = self.take_entries();
        self.rebuild(entries);
    }

    /// Recompute every key from its value, then rebuild balanced.
    pub fn rekey<F: FnMut(&V) -> K>(&mut self, mut key_of: F) {
        let mut entries: Vec<(K, V)> = self
            .take_entries()
            .into_iter()
            .map(|(_, v)| (key_of(&v), v))
            .collect();
        entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        self.rebuild(entries);
    }

    /// First value in pre-order matching `pred`.
    pub fn find_by<P: FnMut(&V) -> bool>(&self, mut pred: P) -> Option<&V> {
        self.preorder().map(|n| &n.value).find(|v| pred(v))
    }

    /// Mutable form of [`find_by`](Self::find_by).
    pub fn find_by_mut<P: FnMut(&V) -> bool>(&mut self, mut pred: P) -> Option<&mut V> {
        find_in_mut(self.root.as_deref_mut(), &mut pred)
    }

    /// Remove the first entry in key order whose value matches `pred`, then
    /// rebuild balanced.
    pub fn remove_by<P: FnMut(&V) -> bool>(&mut self, mut pred: P) -> Option<(K, V)> {
        let mut entries = self.take_entries();
        let removed = entries
            .iter()
            .position(|(_, v)| pred(v))
            .map(|i| entries.remove(i));
        self.rebuild(entries);
        removed
    }

    /// Lazy pre-order traversal (node, left subtree, right subtree).
    pub fn preorder(&self) -> Preorder<'_, K, V> {
        Preorder {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Lazy in-order traversal, in ascending key order.
    pub fn inorder(&self) -> Inorder<'_, K, V> {
        let mut iter = Inorder { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.inorder().map(|n| &n.key)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.inorder().map(|n| &n.value)
    }

    /// Empty the tree, returning its entries in order.
    fn take_entries(&mut self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.len);
        collect_inorder(self.root.take(), &mut out);
        self.len = 0;
        out
    }

    fn rebuild(&mut self, entries: Vec<(K, V)>) {
        self.len = entries.len();
        let mut slots: Vec<Option<(K, V)>> = entries.into_iter().map(Some).collect();
        self.root = build_balanced(&mut slots);
    }
}

fn delete_from<K: PartialOrd, V>(mut slot: &mut Option<Box<Node<K, V>>>, key: &K) -> Option<V> {
    loop {
        let ord = key.partial_cmp(&slot.as_ref()?.key)?;
        slot = match ord {
            Ordering::Less => &mut slot.as_mut()?.left,
            Ordering::Greater => &mut slot.as_mut()?.right,
            Ordering::Equal => break,
        };
    }

    let mut node = slot.take()?;
    *slot = match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            let mut right = Some(right);
            let (key, value) = take_min(&mut right)?;
            Some(Box::new(Node {
                key,
                value,
                left: Some(left),
                right,
            }))
        }
    };
    Some(node.value)
}

/// Detach the leftmost node of a subtree.
fn take_min<K, V>(mut slot: &mut Option<Box<Node<K, V>>>) -> Option<(K, V)> {
    while slot.as_ref()?.left.is_some() {
        slot = &mut slot.as_mut()?.left;
    }
    let mut node = slot.take()?;
    *slot = node.right.take();
    Some((node.key, node.value))
}

fn find_in_mut<'a, K, V, P: FnMut(&V) -> bool>(
    root: Option<&'a mut Node<K, V>>,
    pred: &mut P,
) -> Option<&'a mut V> {
    let mut stack: Vec<&'a mut Node<K, V>> = root.into_iter().collect();
    while let Some(node) = stack.pop() {
        let Node {
            value, left, right, ..
        } = node;
        if pred(value) {
            return Some(value);
        }
        stack.extend(right.as_deref_mut());
        stack.extend(left.as_deref_mut());
    }
    None
}

fn collect_inorder<K, V>(root: Option<Box<Node<K, V>>>, out: &mut Vec<(K, V)>) {
    let mut stack = Vec::new();
    let mut current = root;
    loop {
        while let Some(mut node) = current {
            current = node.left.take();
            stack.push(node);
        }
        let Some(node) = stack.pop() else {
            break;
        };
        let Node {
            key, value, right, ..
        } = *node;
        out.push((key, value));
        current = right;
    }
}

fn build_balanced<K, V>(slots: &mut [Option<(K, V)>]) -> Option<Box<Node<K, V>>> {
    if slots.is_empty() {
        return None;
    }
    let mid = (slots.len() - 1) / 2;
    let (lower, rest) = slots.split_at_mut(mid);
    let (middle, upper) = rest.split_at_mut(1);
    let (key, value) = middle[0].take()?;
    Some(Box::new(Node {
        key,
        value,
        left: build_balanced(lower),
        right: build_balanced(upper),
    }))
}

/// Pre-order iterator over tree nodes.
pub struct Preorder<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Preorder<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node)
    }
}

/// In-order iterator over tree nodes.
pub struct Inorder<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Inorder<'a, K, V> {
    fn push_left(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, K, V> Iterator for Inorder<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[i32]) -> BinarySearchTree<i32, String> {
        let mut tree = BinarySearchTree::new();
        for &k in keys {
            tree.insert(k, format!("v{}", k));
        }
        tree
    }

    fn height<K, V>(node: Option<&Node<K, V>>) -> usize {
        node.map_or(0, |n| 1 + height(n.left()).max(height(n.right())))
    }

    #[test]
    fn test_insert_and_traverse() {
        let tree = tree_of(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(tree.len(), 7);

        let pre: Vec<i32> = tree.preorder().map(|n| n.key).collect();
        assert_eq!(pre, vec![50, 30, 20, 40, 70, 60, 80]);

        let sorted: Vec<i32> = tree.keys().copied().collect();
        assert_eq!(sorted, vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(tree.values().next().map(String::as_str), Some("v20"));
    }

    #[test]
    fn test_duplicates_go_left() {
        let mut tree = BinarySearchTree::new();
        tree.insert(5, "first");
        tree.insert(5, "second");

        let root = tree.root().unwrap();
        assert_eq!(root.value, "first");
        assert_eq!(root.left().unwrap().value, "second");
        assert!(root.right().is_none());
    }

    #[test]
    fn test_find() {
        let mut tree = tree_of(&[8, 3, 10, 1, 6, 14]);
        assert_eq!(tree.find(&6).map(String::as_str), Some("v6"));
        assert!(tree.find(&7).is_none());

        *tree.find_mut(&14).unwrap() = "changed".to_string();
        assert_eq!(tree.find(&14).map(String::as_str), Some("changed"));
        assert_eq!(tree.min().map(|(k, _)| *k), Some(1));
        assert!(BinarySearchTree::<i32, ()>::new().min().is_none());
    }

    #[test]
    fn test_delete() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80]);

        // Leaf, single child and two children
        assert_eq!(tree.delete(&20).as_deref(), Some("v20"));
        assert_eq!(tree.delete(&30).as_deref(), Some("v30"));
        assert_eq!(tree.delete(&50).as_deref(), Some("v50"));
        assert!(tree.delete(&99).is_none());

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().unwrap().key, 60);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![40, 60, 70, 80]);
    }

    #[test]
    fn test_balance() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(height(tree.root()), 7);

        tree.balance();

        assert_eq!(height(tree.root()), 3);
        assert_eq!(tree.root().unwrap().key, 4);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_largest_smaller_than() {
        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.find_largest_smaller_than(&5).map(|(k, _)| *k), Some(4));
        assert_eq!(tree.find_largest_smaller_than(&100).map(|(k, _)| *k), Some(7));
        assert!(tree.find_largest_smaller_than(&1).is_none());
    }

    #[test]
    fn test_rekey_and_remove_by() {
        let mut tree = tree_of(&[1, 2, 3, 4]);
        tree.rekey(|v| -v[1..].parse::<i32>().unwrap());
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![-4, -3, -2, -1]);

        assert_eq!(tree.find_by(|v| v == "v3").map(String::as_str), Some("v3"));
        tree.find_by_mut(|v| v == "v2").unwrap().push('!');
        assert_eq!(tree.find(&-2).map(String::as_str), Some("v2!"));

        let (k, _) = tree.remove_by(|v| v.ends_with('!')).unwrap();
        assert_eq!(k, -2);
        assert_eq!(tree.len(), 3);
        assert!(tree.remove_by(|v| v.is_empty()).is_none());
    }

    #[test]
    fn test_sorted_chain_stays_off_the_call_stack() {
        const N: u32 = 20_000;
        let mut tree = BinarySearchTree::new();
        for k in 0..N {
            tree.insert(k, k);
        }
        assert_eq!(tree.len(), N as usize);

        *tree.find_by_mut(|&v| v == N - 1).unwrap() += 1;
        assert_eq!(tree.find(&(N - 1)), Some(&N));

        assert_eq!(tree.delete(&(N - 2)), Some(N - 2));
        assert_eq!(tree.delete(&0), Some(0));
        assert_eq!(tree.len(), N as usize - 2);
        assert_eq!(tree.find_largest_smaller_than(&(N - 1)), Some((&(N - 3), &(N - 3))));

        let keys: Vec<u32> = tree.keys().copied().collect();
        assert_eq!(keys.first(), Some(&1));
        assert_eq!(keys.last(), Some(&(N - 1)));

        let (k, _) = tree.remove_by(|&v| v == 1).unwrap();
        assert_eq!(k, 1);
        assert_eq!(tree.len(), N as usize - 3);
    }
}
