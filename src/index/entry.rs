//! Tree entries and the handles that identify them.

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

/// Slot position inside an index arena.
pub(crate) type NodeId = usize;

static NEXT_INDEX_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique identity of one [`AnnotationIndex`](crate::AnnotationIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexId(u32);

impl IndexId {
    pub(crate) fn next() -> Self {
        Self(NEXT_INDEX_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque identity of an entry.
///
/// Two entries with identical ranges and values still have distinct handles.
/// A handle stays comparable after its entry is removed, but the index no
/// longer resolves it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryHandle {
    pub(crate) index: IndexId,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl EntryHandle {
    pub(crate) fn node(self) -> NodeId {
        self.slot as NodeId
    }

    /// The index this handle was issued by.
    pub fn index_id(&self) -> IndexId {
        self.index
    }
}

impl fmt::Debug for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryHandle({}:{}v{})", self.index.0, self.slot, self.generation)
    }
}

/// One annotation stored in an index: a half-open range `[start, end)` and
/// an attached value.
///
/// Entries are owned by their index. The structural fields (links, height
/// and `max_end`) are maintained by the index and never exposed.
pub struct Entry<V> {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) value: V,
    pub(crate) sequence: u64,
    pub(crate) handle: EntryHandle,

    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    /// Leaves have height 1.
    pub(crate) height: u32,
    /// Largest `end` in this entry's subtree, itself included.
    pub(crate) max_end: usize,
}

impl<V> Entry<V> {
    pub(crate) fn leaf(start: usize, end: usize, value: V, sequence: u64, handle: EntryHandle) -> Self {
        Self {
            start,
            end,
            value,
            sequence,
            handle,
            parent: None,
            left: None,
            right: None,
            height: 1,
            max_end: end,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the range in coordinate units.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for zero-length entries (`start == end`).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Insertion sequence; breaks ties between entries with equal `start`.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn handle(&self) -> EntryHandle {
        self.handle
    }

    /// Position in the `(start, sequence)` total order.
    pub(crate) fn key(&self) -> (usize, u64) {
        (self.start, self.sequence)
    }
}

impl<V: fmt::Debug> fmt::Debug for Entry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("range", &self.range())
            .field("value", &self.value)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Arena slot. Vacant slots form a free list and remember the generation
/// the next occupant will receive.
pub(crate) enum Slot<V> {
    Occupied(Entry<V>),
    Vacant { generation: u32, next_free: Option<NodeId> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(slot: u32, generation: u32) -> EntryHandle {
        EntryHandle {
            index: IndexId(7),
            slot,
            generation,
        }
    }

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::leaf(4, 9, "noun", 3, handle(0, 0));
        assert_eq!(entry.range(), 4..9);
        assert_eq!(entry.len(), 5);
        assert!(!entry.is_empty());
        assert_eq!(entry.max_end, 9);
        assert_eq!(entry.height, 1);
        assert_eq!(entry.key(), (4, 3));
    }

    #[test]
    fn test_zero_length_entry() {
        let entry = Entry::leaf(6, 6, (), 0, handle(1, 0));
        assert!(entry.is_empty());
        assert_eq!(entry.len(), 0);
    }

    #[test]
    fn test_handles_differ_by_generation() {
        assert_ne!(handle(2, 0), handle(2, 1));
        assert_eq!(format!("{:?}", handle(2, 1)), "EntryHandle(7:2v1)");
    }
}
