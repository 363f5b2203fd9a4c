//! Cursor over an index's `(start, sequence)` order.

use super::{AnnotationIndex, Entry, EntryHandle, NodeId};
use crate::{IndexError, IndexResult};

/// Stateful cursor bound to one [`AnnotationIndex`].
///
/// The navigator holds only a position. Every step is recomputed from the
/// tree's parent and child links, so any number of navigators can walk the
/// same index at once. The shared borrow keeps the index from being mutated
/// underneath a live navigator; to continue a walk after a mutation, keep
/// [`position`](Self::position) and resume with
/// [`AnnotationIndex::navigator_at`], which rejects removed entries with
/// [`IndexError::StaleHandle`].
///
/// # Example
///
/// ```
/// use layered_span_index::AnnotationIndex;
///
/// let index = AnnotationIndex::try_from_iter(
///     [2, 4, 6, 6, 8].iter().map(|&s| (s, s + 8, ())),
/// ).unwrap();
///
/// let mut nav = index.navigator();
/// assert!(nav.seek_after(5));
/// assert_eq!(nav.start().unwrap(), 6);
/// assert!(nav.seek_floor(5));
/// assert_eq!(nav.start().unwrap(), 4);
/// ```
pub struct AnnotationNavigator<'a, V> {
    index: &'a AnnotationIndex<V>,
    current: Option<NodeId>,
}

impl<'a, V> Clone for AnnotationNavigator<'a, V> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            current: self.current,
        }
    }
}

impl<'a, V> std::fmt::Debug for AnnotationNavigator<'a, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationNavigator")
            .field("index", &self.index.id())
            .field("position", &self.position())
            .finish()
    }
}

impl<V> AnnotationIndex<V> {
    /// A navigator with no current position.
    pub fn navigator(&self) -> AnnotationNavigator<'_, V> {
        AnnotationNavigator {
            index: self,
            current: None,
        }
    }

    /// A navigator positioned on the entry for `handle`.
    pub fn navigator_at(&self, handle: EntryHandle) -> IndexResult<AnnotationNavigator<'_, V>> {
        let id = self.resolve(handle)?;
        Ok(AnnotationNavigator {
            index: self,
            current: Some(id),
        })
    }
}

impl<'a, V> AnnotationNavigator<'a, V> {
    fn settle(&mut self, position: Option<NodeId>) -> bool {
        self.current = position;
        position.is_some()
    }

    /// Step to the in-order successor, or to the first entry when unset.
    ///
    /// Returns false and clears the position when there is no successor.
    pub fn move_next(&mut self) -> bool {
        let next = match self.current {
            Some(id) => self.index.successor(id),
            None => self.index.root().map(|root| self.index.leftmost(root)),
        };
        self.settle(next)
    }

    /// Step to the in-order predecessor, or to the last entry when unset.
    ///
    /// Returns false and clears the position when there is no predecessor.
    pub fn move_prev(&mut self) -> bool {
        let prev = match self.current {
            Some(id) => self.index.predecessor(id),
            None => self.index.root().map(|root| self.index.rightmost(root)),
        };
        self.settle(prev)
    }

    /// Seek to the first entry with `start > x`.
    pub fn seek_after(&mut self, x: usize) -> bool {
        let found = self.index.first_matching(|start| start > x);
        self.settle(found)
    }

    /// Seek to the first entry with `start >= x`.
    pub fn seek_ceiling(&mut self, x: usize) -> bool {
        let found = self.index.first_matching(|start| start >= x);
        self.settle(found)
    }

    /// Seek to the last entry with `start <= x`.
    pub fn seek_floor(&mut self, x: usize) -> bool {
        let found = self.index.last_matching(|start| start <= x);
        self.settle(found)
    }

    /// Seek to the last entry with `start < x`.
    pub fn seek_before(&mut self, x: usize) -> bool {
        let found = self.index.last_matching(|start| start < x);
        self.settle(found)
    }

    /// Clear the position.
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> IndexResult<&'a Entry<V>> {
        self.current
            .map(|id| self.index.node(id))
            .ok_or(IndexError::NoCurrentPosition)
    }

    pub fn start(&self) -> IndexResult<usize> {
        self.current().map(Entry::start)
    }

    /// Handle of the current entry, if any.
    pub fn position(&self) -> Option<EntryHandle> {
        self.current.map(|id| self.index.node(id).handle)
    }

    pub fn index(&self) -> &'a AnnotationIndex<V> {
        self.index
    }
}
