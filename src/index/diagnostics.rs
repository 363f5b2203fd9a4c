//! Full-traversal invariant checks. Not used on any mutation path.

use super::{AnnotationIndex, NodeId};

impl<V> AnnotationIndex<V> {
    /// True if every node's stored height is correct and its subtrees differ
    /// in height by at most one.
    pub fn verify_balance(&self) -> bool {
        self.root().map_or(true, |root| self.balanced_height(root).is_some())
    }

    /// True if every node's `max_end` equals the largest `end` in its subtree.
    pub fn verify_augmentation(&self) -> bool {
        self.root().map_or(true, |root| self.checked_max_end(root).is_some())
    }

    /// True if the in-order walk is strictly ascending by `(start, sequence)`,
    /// parent links mirror child links, and the walk visits `len()` entries.
    pub fn verify_order(&self) -> bool {
        if let Some(root) = self.root() {
            if self.node(root).parent.is_some() || !self.links_consistent(root) {
                return false;
            }
        }

        let keys: Vec<_> = self.entries().map(|e| e.key()).collect();
        keys.len() == self.len() && keys.windows(2).all(|pair| pair[0] < pair[1])
    }

    fn balanced_height(&self, id: NodeId) -> Option<u32> {
        let node = self.node(id);
        let left = match node.left {
            Some(left) => self.balanced_height(left)?,
            None => 0,
        };
        let right = match node.right {
            Some(right) => self.balanced_height(right)?,
            None => 0,
        };
        if left.abs_diff(right) > 1 {
            return None;
        }
        let height = 1 + left.max(right);
        (height == node.height).then(|| height)
    }

    fn checked_max_end(&self, id: NodeId) -> Option<usize> {
        let node = self.node(id);
        let mut max_end = node.end;
        for child in [node.left, node.right].into_iter().flatten() {
            max_end = max_end.max(self.checked_max_end(child)?);
        }
        (max_end == node.max_end).then(|| max_end)
    }

    fn links_consistent(&self, id: NodeId) -> bool {
        let node = self.node(id);
        [node.left, node.right].into_iter().flatten().all(|child| {
            self.node(child).parent == Some(id) && self.links_consistent(child)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::AnnotationIndex;

    #[test]
    fn test_detects_corrupted_height() {
        let mut index = AnnotationIndex::try_from_iter((0..7).map(|i| (i, i + 1, ()))).unwrap();
        assert!(index.verify_balance());

        let root = index.root().unwrap();
        index.node_mut(root).height += 1;
        assert!(!index.verify_balance());
    }

    #[test]
    fn test_detects_corrupted_max_end() {
        let mut index = AnnotationIndex::try_from_iter((0..7).map(|i| (i, i + 1, ()))).unwrap();
        assert!(index.verify_augmentation());

        let root = index.root().unwrap();
        index.node_mut(root).max_end = 3;
        assert!(!index.verify_augmentation());
    }

    #[test]
    fn test_detects_broken_parent_link() {
        let mut index = AnnotationIndex::try_from_iter((0..7).map(|i| (i, i + 1, ()))).unwrap();
        assert!(index.verify_order());

        let root = index.root().unwrap();
        let left = index.node(root).left.unwrap();
        index.node_mut(left).parent = None;
        assert!(!index.verify_order());
    }
}
