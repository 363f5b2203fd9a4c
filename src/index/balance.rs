//! AVL rebalancing and `max_end` maintenance.
//!
//! Every rotation returns the new subtree root and leaves both rotated nodes
//! with refreshed height and `max_end`, so callers never see stale
//! augmentation after a double rotation.

use super::{AnnotationIndex, NodeId};

impl<V> AnnotationIndex<V> {
    pub(super) fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.node(id).height)
    }

    fn max_end_of(&self, id: Option<NodeId>) -> Option<usize> {
        id.map(|id| self.node(id).max_end)
    }

    /// Left height minus right height.
    fn balance_factor(&self, id: NodeId) -> i64 {
        let node = self.node(id);
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    /// Recompute height and `max_end` from the children.
    fn refresh(&mut self, id: NodeId) {
        let (left, right, end) = {
            let node = self.node(id);
            (node.left, node.right, node.end)
        };
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let max_end = end
            .max(self.max_end_of(left).unwrap_or(end))
            .max(self.max_end_of(right).unwrap_or(end));

        let node = self.node_mut(id);
        node.height = height;
        node.max_end = max_end;
    }

    /// Point `parent`'s link at `old` to `new` instead (or the root link).
    pub(super) fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Replace the subtree rooted at `old` with the one rooted at `new`.
    pub(super) fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.node(old).parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
    }

    //     x               y
    //    / \             / \
    //   a   y    ==>    x   c
    //      / \         / \
    //     b   c       a   b
    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.node(x).right else {
            return x;
        };
        let parent = self.node(x).parent;
        let inner = self.node(y).left;

        self.node_mut(x).right = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }
        self.replace_child(parent, x, Some(y));
        self.node_mut(y).parent = parent;
        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);

        self.refresh(x);
        self.refresh(y);
        tracing::trace!(
            pivot = ?self.node(x).handle,
            new_root = ?self.node(y).handle,
            "rotate left"
        );
        y
    }

    //       x           y
    //      / \         / \
    //     y   c  ==>  a   x
    //    / \             / \
    //   a   b           b   c
    fn rotate_right(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.node(x).left else {
            return x;
        };
        let parent = self.node(x).parent;
        let inner = self.node(y).right;

        self.node_mut(x).left = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }
        self.replace_child(parent, x, Some(y));
        self.node_mut(y).parent = parent;
        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);

        self.refresh(x);
        self.refresh(y);
        tracing::trace!(
            pivot = ?self.node(x).handle,
            new_root = ?self.node(y).handle,
            "rotate right"
        );
        y
    }

    /// Restore the AVL bound at `id`, returning the subtree's new root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.refresh(id);
        let balance = self.balance_factor(id);

        if balance > 1 {
            let Some(left) = self.node(id).left else {
                return id;
            };
            // Left-right case
            if self.balance_factor(left) < 0 {
                self.rotate_left(left);
            }
            self.rotate_right(id)
        } else if balance < -1 {
            let Some(right) = self.node(id).right else {
                return id;
            };
            // Right-left case
            if self.balance_factor(right) > 0 {
                self.rotate_right(right);
            }
            self.rotate_left(id)
        } else {
            id
        }
    }

    /// Walk from `from` to the root, rebalancing and refreshing each ancestor.
    pub(super) fn retrace(&mut self, from: Option<NodeId>) {
        let mut cursor = from;
        while let Some(id) = cursor {
            let parent = self.node(id).parent;
            self.rebalance(id);
            cursor = parent;
        }
    }
}
