//! The interval index: an AVL tree of [`Entry`] values stored in an arena.
//!
//! Entries are ordered by `(start, sequence)`. Because every new entry gets a
//! sequence larger than any existing one, entries sharing a `start` keep
//! their insertion order in every ascending traversal.
//!
//! Tree links are arena slot indices rather than pointers. Removed slots go
//! on a free list and are reused with a bumped generation, so a handle to a
//! removed entry never resolves to its successor in the slot.

mod balance;
mod diagnostics;
mod entry;
mod navigator;
mod search;

use std::fmt;

use crate::{IndexError, IndexResult};

pub use entry::{Entry, EntryHandle, IndexId};
pub use navigator::AnnotationNavigator;
pub use search::{CoverEntries, Overlaps, Pruner, SearchEntries};

pub(crate) use entry::{NodeId, Slot};

/// Balanced, augmented interval index over half-open ranges `[start, end)`.
///
/// # Example
///
/// ```
/// use layered_span_index::AnnotationIndex;
///
/// let mut index = AnnotationIndex::new();
/// index.add(10, 18, "A").unwrap();
/// index.add(2, 6, "B").unwrap();
/// index.add(10, 18, "C").unwrap();
///
/// let values: Vec<_> = index.cover_entries(10, 18).map(|e| *e.value()).collect();
/// assert_eq!(values, vec!["A", "C"]);
///
/// let overlapping: Vec<_> = index.overlap_entries(5, 11).map(|e| *e.value()).collect();
/// assert_eq!(overlapping, vec!["B", "A", "C"]);
/// assert!(index.verify_balance());
/// ```
pub struct AnnotationIndex<V> {
    id: IndexId,
    slots: Vec<Slot<V>>,
    free: Option<NodeId>,
    root: Option<NodeId>,
    len: usize,
    next_sequence: u64,
}

impl<V> Default for AnnotationIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for AnnotationIndex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationIndex")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("height", &self.height())
            .finish()
    }
}

impl<V> AnnotationIndex<V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty index with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: IndexId::next(),
            slots: Vec::with_capacity(capacity),
            free: None,
            root: None,
            len: 0,
            next_sequence: 0,
        }
    }

    /// Build an index from `(start, end, value)` triples, in iteration order.
    ///
    /// Fails on the first inverted range.
    pub fn try_from_iter<I>(iter: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, V)>,
    {
        let iter = iter.into_iter();
        let mut index = Self::with_capacity(iter.size_hint().0);
        for (start, end, value) in iter {
            index.add(start, end, value)?;
        }
        Ok(index)
    }

    pub fn id(&self) -> IndexId {
        self.id
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Insert `[start, end)` with an attached value.
    ///
    /// Returns the new entry's handle. Entries with equal `start` are placed
    /// after every existing entry with that `start`.
    pub fn add(&mut self, start: usize, end: usize, value: V) -> IndexResult<EntryHandle> {
        if start > end {
            tracing::debug!(start, end, "rejecting annotation with inverted range");
            return Err(IndexError::InvalidRange { start, end });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let id = self.allocate(start, end, value, sequence);

        // The new sequence is the largest in the tree, so ties descend right.
        let mut parent = None;
        let mut go_left = false;
        let mut cursor = self.root;
        while let Some(current) = cursor {
            let node = self.node(current);
            parent = Some(current);
            go_left = start < node.start;
            cursor = if go_left { node.left } else { node.right };
        }

        self.node_mut(id).parent = parent;
        match parent {
            None => self.root = Some(id),
            Some(parent) if go_left => self.node_mut(parent).left = Some(id),
            Some(parent) => self.node_mut(parent).right = Some(id),
        }
        self.len += 1;
        self.retrace(parent);

        Ok(self.node(id).handle)
    }

    /// Remove the entry identified by `handle` and return its value.
    ///
    /// Removal is by identity: of several entries with the same range and
    /// value, only this one is removed.
    pub fn remove(&mut self, handle: EntryHandle) -> IndexResult<V> {
        let id = match self.resolve(handle) {
            Ok(id) => id,
            Err(_) => {
                tracing::debug!(?handle, "remove called with a handle that is not live");
                return Err(IndexError::NotFound(handle));
            }
        };

        let (left, right, parent) = {
            let node = self.node(id);
            (node.left, node.right, node.parent)
        };

        let retrace_from = match (left, right) {
            (None, _) => {
                self.transplant(id, right);
                parent
            }
            (_, None) => {
                self.transplant(id, left);
                parent
            }
            (Some(left), Some(right)) => {
                // Splice the in-order successor into the removed node's place.
                let successor = self.leftmost(right);
                let successor_parent = self.node(successor).parent;
                let from = if successor_parent == Some(id) {
                    Some(successor)
                } else {
                    let successor_right = self.node(successor).right;
                    self.transplant(successor, successor_right);
                    self.node_mut(successor).right = Some(right);
                    self.node_mut(right).parent = Some(successor);
                    successor_parent
                };
                self.transplant(id, Some(successor));
                self.node_mut(successor).left = Some(left);
                self.node_mut(left).parent = Some(successor);
                tracing::trace!(
                    removed = ?handle,
                    successor = ?self.node(successor).handle,
                    "spliced successor into removed entry position"
                );
                from
            }
        };

        self.len -= 1;
        let entry = self.release(id);
        self.retrace(retrace_from);

        Ok(entry.value)
    }

    /// Remove every entry. Outstanding handles stop resolving.
    pub fn clear(&mut self) {
        self.root = None;
        self.free = None;
        self.len = 0;
        for id in (0..self.slots.len()).rev() {
            let generation = match &self.slots[id] {
                Slot::Occupied(entry) => entry.handle.generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };
            self.slots[id] = Slot::Vacant {
                generation,
                next_free: self.free,
            };
            self.free = Some(id);
        }
    }

    /// The live entry for `handle`, if any.
    pub fn get(&self, handle: EntryHandle) -> Option<&Entry<V>> {
        self.resolve(handle).ok().map(|id| self.node(id))
    }

    /// Mutable access to the value of a live entry. The range is fixed.
    pub fn get_value_mut(&mut self, handle: EntryHandle) -> Option<&mut V> {
        let id = self.resolve(handle).ok()?;
        Some(&mut self.node_mut(id).value)
    }

    pub fn contains(&self, handle: EntryHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// First entry in ascending order.
    pub fn first(&self) -> Option<&Entry<V>> {
        self.root.map(|root| self.node(self.leftmost(root)))
    }

    /// Last entry in ascending order.
    pub fn last(&self) -> Option<&Entry<V>> {
        self.root.map(|root| self.node(self.rightmost(root)))
    }

    /// All entries in ascending `(start, sequence)` order.
    pub fn entries(&self) -> Entries<'_, V> {
        Entries {
            index: self,
            front: self.root.map(|root| self.leftmost(root)),
            back: self.root.map(|root| self.rightmost(root)),
            remaining: self.len,
        }
    }

    // ------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------

    fn allocate(&mut self, start: usize, end: usize, value: V, sequence: u64) -> NodeId {
        match self.free {
            Some(id) => {
                let (generation, next_free) = match &self.slots[id] {
                    Slot::Vacant { generation, next_free } => (*generation, *next_free),
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                self.free = next_free;
                let handle = EntryHandle {
                    index: self.id,
                    slot: id as u32,
                    generation,
                };
                self.slots[id] = Slot::Occupied(Entry::leaf(start, end, value, sequence, handle));
                id
            }
            None => {
                let id = self.slots.len();
                let handle = EntryHandle {
                    index: self.id,
                    slot: id as u32,
                    generation: 0,
                };
                self.slots
                    .push(Slot::Occupied(Entry::leaf(start, end, value, sequence, handle)));
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Entry<V> {
        let generation = self.node(id).handle.generation.wrapping_add(1);
        let vacant = Slot::Vacant {
            generation,
            next_free: self.free,
        };
        self.free = Some(id);
        match std::mem::replace(&mut self.slots[id], vacant) {
            Slot::Occupied(entry) => entry,
            Slot::Vacant { .. } => unreachable!("released a vacant slot"),
        }
    }

    /// Map a handle to its slot, distinguishing foreign handles from removed ones.
    pub(crate) fn resolve(&self, handle: EntryHandle) -> IndexResult<NodeId> {
        if handle.index != self.id {
            return Err(IndexError::NotFound(handle));
        }
        match self.slots.get(handle.node()) {
            Some(Slot::Occupied(entry)) if entry.handle == handle => Ok(handle.node()),
            Some(_) => Err(IndexError::StaleHandle(handle)),
            None => Err(IndexError::NotFound(handle)),
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Entry<V> {
        match &self.slots[id] {
            Slot::Occupied(entry) => entry,
            Slot::Vacant { .. } => unreachable!("tree link points at vacant slot {}", id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Entry<V> {
        match &mut self.slots[id] {
            Slot::Occupied(entry) => entry,
            Slot::Vacant { .. } => unreachable!("tree link points at vacant slot {}", id),
        }
    }

    // ------------------------------------------------------------------
    // Tree walking
    // ------------------------------------------------------------------

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    /// In-order successor through the right subtree or the parent chain.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.node(id).right {
            return Some(self.leftmost(right));
        }
        let mut child = id;
        let mut parent = self.node(id).parent;
        while let Some(p) = parent {
            if self.node(p).left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.node(p).parent;
        }
        None
    }

    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.node(id).left {
            return Some(self.rightmost(left));
        }
        let mut child = id;
        let mut parent = self.node(id).parent;
        while let Some(p) = parent {
            if self.node(p).right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.node(p).parent;
        }
        None
    }

    /// First entry whose start satisfies `pred`.
    ///
    /// `pred` must be monotone over ascending starts (false, then true).
    pub(crate) fn first_matching(&self, pred: impl Fn(usize) -> bool) -> Option<NodeId> {
        let mut best = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            if pred(node.start) {
                best = Some(id);
                cursor = node.left;
            } else {
                cursor = node.right;
            }
        }
        best
    }

    /// Last entry whose start satisfies `pred`.
    ///
    /// `pred` must be monotone over ascending starts (true, then false).
    pub(crate) fn last_matching(&self, pred: impl Fn(usize) -> bool) -> Option<NodeId> {
        let mut best = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            if pred(node.start) {
                best = Some(id);
                cursor = node.right;
            } else {
                cursor = node.left;
            }
        }
        best
    }
}

/// Ascending iterator over an index, see [`AnnotationIndex::entries`].
pub struct Entries<'a, V> {
    index: &'a AnnotationIndex<V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, V> Clone for Entries<'a, V> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Entries<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = self.index.successor(id);
        Some(self.index.node(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> DoubleEndedIterator for Entries<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = self.index.predecessor(id);
        Some(self.index.node(id))
    }
}

impl<'a, V> ExactSizeIterator for Entries<'a, V> {}

impl<'a, V> IntoIterator for &'a AnnotationIndex<V> {
    type Item = &'a Entry<V>;
    type IntoIter = Entries<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts<V>(index: &AnnotationIndex<V>) -> Vec<usize> {
        index.entries().map(|e| e.start()).collect()
    }

    #[test]
    fn test_empty_index() {
        let index: AnnotationIndex<()> = AnnotationIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.height(), 0);
        assert!(index.first().is_none());
        assert!(index.last().is_none());
        assert_eq!(index.entries().count(), 0);
        assert!(index.verify_balance());
    }

    #[test]
    fn test_add_rejects_inverted_range() {
        let mut index = AnnotationIndex::new();
        index.add(1, 4, "a").unwrap();

        let err = index.add(9, 3, "bad").unwrap_err();
        assert_eq!(err, IndexError::InvalidRange { start: 9, end: 3 });
        assert_eq!(index.len(), 1);
        assert_eq!(starts(&index), vec![1]);
    }

    #[test]
    fn test_zero_length_entries_are_accepted() {
        let mut index = AnnotationIndex::new();
        let handle = index.add(5, 5, "caret").unwrap();
        assert_eq!(index.get(handle).map(|e| e.range()), Some(5..5));
    }

    #[test]
    fn test_equal_starts_keep_insertion_order() {
        let mut index = AnnotationIndex::new();
        for (i, end) in [9, 3, 7, 5].iter().enumerate() {
            index.add(3, *end, i).unwrap();
        }
        index.add(1, 2, 99).unwrap();

        let values: Vec<_> = index.entries().map(|e| *e.value()).collect();
        assert_eq!(values, vec![99, 0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_returns_value_and_rejects_twice() {
        let mut index = AnnotationIndex::new();
        let a = index.add(10, 18, "A").unwrap();
        let b = index.add(10, 18, "A").unwrap();
        assert_ne!(a, b);

        assert_eq!(index.remove(a), Ok("A"));
        assert_eq!(index.remove(a), Err(IndexError::NotFound(a)));
        assert!(index.contains(b));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_rejects_foreign_handle() {
        let mut first = AnnotationIndex::new();
        let mut second = AnnotationIndex::new();
        let foreign = first.add(0, 1, ()).unwrap();
        second.add(0, 1, ()).unwrap();

        assert_eq!(second.remove(foreign), Err(IndexError::NotFound(foreign)));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_reused_slot_does_not_resolve_old_handle() {
        let mut index = AnnotationIndex::new();
        let old = index.add(0, 4, "old").unwrap();
        index.remove(old).unwrap();
        let new = index.add(0, 4, "new").unwrap();

        assert_eq!(old.slot, new.slot);
        assert!(index.get(old).is_none());
        assert_eq!(index.resolve(old), Err(IndexError::StaleHandle(old)));
        assert_eq!(index.get(new).map(|e| *e.value()), Some("new"));
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut index = AnnotationIndex::new();
        let handles: Vec<_> = (0..10).map(|i| index.add(i, i + 2, i).unwrap()).collect();
        index.clear();

        assert!(index.is_empty());
        assert!(handles.iter().all(|h| !index.contains(*h)));

        let fresh = index.add(3, 4, 42).unwrap();
        assert!(!handles.contains(&fresh));
        assert_eq!(starts(&index), vec![3]);
    }

    #[test]
    fn test_get_value_mut() {
        let mut index = AnnotationIndex::new();
        let handle = index.add(2, 8, String::from("verb")).unwrap();
        if let Some(value) = index.get_value_mut(handle) {
            value.push_str("-phrase");
        }
        assert_eq!(index.get(handle).map(|e| e.value().as_str()), Some("verb-phrase"));
    }

    #[test]
    fn test_entries_double_ended() {
        let index = AnnotationIndex::try_from_iter((0..6).map(|i| (i * 2, i * 2 + 1, i))).unwrap();
        let mut iter = index.entries();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next().map(|e| e.start()), Some(0));
        assert_eq!(iter.next_back().map(|e| e.start()), Some(10));
        let middle: Vec<_> = iter.map(|e| e.start()).collect();
        assert_eq!(middle, vec![2, 4, 6, 8]);

        let reversed: Vec<_> = index.entries().rev().map(|e| e.start()).collect();
        assert_eq!(reversed, vec![10, 8, 6, 4, 2, 0]);
    }

    #[test]
    fn test_try_from_iter_stops_on_invalid_range() {
        let result = AnnotationIndex::try_from_iter(vec![(0, 1, ()), (5, 2, ())]);
        assert_eq!(result.unwrap_err(), IndexError::InvalidRange { start: 5, end: 2 });
    }

    #[test]
    fn test_height_stays_logarithmic() {
        let mut index = AnnotationIndex::new();
        for i in 0..1024 {
            index.add(i, i + 1, ()).unwrap();
        }
        // AVL height bound: 1.44 * log2(n + 2)
        assert!(index.height() <= 15, "height {}", index.height());
        assert!(index.verify_balance());
    }
}
