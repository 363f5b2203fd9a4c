//! Exact-range and augmented (pruning) searches.

use super::{AnnotationIndex, Entry, NodeId};

/// Decides which parts of the tree an augmented search visits.
///
/// Starts are visited in ascending order and every subtree carries the
/// largest `end` it contains, so a pruner can skip whole subtrees that end
/// too early and stop once starts run past the query.
pub trait Pruner {
    /// Whether a subtree whose largest `end` is `max_end` can hold a match.
    fn descend(&self, max_end: usize) -> bool;

    /// True once `start` is past every possible match. All later entries
    /// have a start at least as large.
    fn exhausted(&self, start: usize) -> bool;

    /// Whether the entry `[start, end)` is a match.
    fn accepts(&self, start: usize, end: usize) -> bool;
}

/// Matches entries overlapping `[from, to)`: `start < to && end > from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlaps {
    pub from: usize,
    pub to: usize,
}

impl Pruner for Overlaps {
    fn descend(&self, max_end: usize) -> bool {
        max_end > self.from
    }

    fn exhausted(&self, start: usize) -> bool {
        start >= self.to
    }

    fn accepts(&self, start: usize, end: usize) -> bool {
        start < self.to && end > self.from
    }
}

impl<V> AnnotationIndex<V> {
    /// Entries whose range is exactly `[from, to)`, in insertion order.
    pub fn cover_entries(&self, from: usize, to: usize) -> CoverEntries<'_, V> {
        CoverEntries {
            index: self,
            next: self.first_matching(|start| start >= from),
            from,
            to,
        }
    }

    /// Entries overlapping `[from, to)`, in ascending order.
    pub fn overlap_entries(&self, from: usize, to: usize) -> SearchEntries<'_, V, Overlaps> {
        self.search(Overlaps { from, to })
    }

    /// Ascending augmented search driven by `pruner`.
    pub fn search<P: Pruner>(&self, pruner: P) -> SearchEntries<'_, V, P> {
        let mut search = SearchEntries {
            index: self,
            pruner,
            stack: Vec::new(),
        };
        search.push_left_spine(self.root());
        search
    }
}

/// Iterator returned by [`AnnotationIndex::cover_entries`].
pub struct CoverEntries<'a, V> {
    index: &'a AnnotationIndex<V>,
    next: Option<NodeId>,
    from: usize,
    to: usize,
}

impl<'a, V> Iterator for CoverEntries<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.next {
            let entry = self.index.node(id);
            if entry.start != self.from {
                self.next = None;
                return None;
            }
            self.next = self.index.successor(id);
            if entry.end == self.to {
                return Some(entry);
            }
        }
        None
    }
}

/// Iterator returned by [`AnnotationIndex::search`].
///
/// An in-order walk with an explicit stack; subtrees rejected by
/// [`Pruner::descend`] are never pushed.
pub struct SearchEntries<'a, V, P> {
    index: &'a AnnotationIndex<V>,
    pruner: P,
    stack: Vec<NodeId>,
}

impl<'a, V, P: Pruner> SearchEntries<'a, V, P> {
    fn push_left_spine(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            let entry = self.index.node(id);
            if !self.pruner.descend(entry.max_end) {
                break;
            }
            self.stack.push(id);
            cursor = entry.left;
        }
    }
}

impl<'a, V, P: Pruner> Iterator for SearchEntries<'a, V, P> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let entry = self.index.node(id);
            if self.pruner.exhausted(entry.start) {
                self.stack.clear();
                return None;
            }
            self.push_left_spine(entry.right);
            if self.pruner.accepts(entry.start, entry.end) {
                return Some(entry);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnnotationIndex<&'static str> {
        AnnotationIndex::try_from_iter(vec![
            (0, 5, "a"),
            (3, 9, "b"),
            (10, 18, "c"),
            (10, 12, "d"),
            (10, 18, "e"),
            (20, 20, "f"),
            (25, 40, "g"),
        ])
        .unwrap()
    }

    fn values<'a>(iter: impl Iterator<Item = &'a Entry<&'static str>>) -> Vec<&'static str> {
        iter.map(|e| *e.value()).collect()
    }

    #[test]
    fn test_cover_entries_in_insertion_order() {
        let index = sample();
        assert_eq!(values(index.cover_entries(10, 18)), vec!["c", "e"]);
        assert_eq!(values(index.cover_entries(10, 12)), vec!["d"]);
        assert!(values(index.cover_entries(10, 11)).is_empty());
        assert!(values(index.cover_entries(11, 18)).is_empty());
    }

    #[test]
    fn test_cover_entries_zero_length() {
        let index = sample();
        assert_eq!(values(index.cover_entries(20, 20)), vec!["f"]);
    }

    #[test]
    fn test_overlap_entries() {
        let index = sample();
        assert_eq!(values(index.overlap_entries(4, 11)), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(values(index.overlap_entries(18, 20)), Vec::<&str>::new());
        assert_eq!(values(index.overlap_entries(17, 26)), vec!["c", "e", "f", "g"]);
        assert_eq!(values(index.overlap_entries(19, 21)), vec!["f"]);
    }

    #[test]
    fn test_overlap_is_half_open() {
        let index = sample();
        // [0,5) touches [5,...) without overlapping
        assert_eq!(values(index.overlap_entries(5, 6)), vec!["b"]);
        assert!(values(index.overlap_entries(40, 50)).is_empty());
    }

    #[test]
    fn test_point_query_matches_strictly_containing_entries() {
        let index = sample();
        assert_eq!(values(index.overlap_entries(4, 4)), vec!["a", "b"]);
        assert!(values(index.overlap_entries(20, 20)).is_empty());
    }

    struct CountingPruner<'c> {
        inner: Overlaps,
        visited: &'c std::cell::Cell<usize>,
    }

    impl Pruner for CountingPruner<'_> {
        fn descend(&self, max_end: usize) -> bool {
            self.inner.descend(max_end)
        }

        fn exhausted(&self, start: usize) -> bool {
            self.inner.exhausted(start)
        }

        fn accepts(&self, start: usize, end: usize) -> bool {
            self.visited.set(self.visited.get() + 1);
            self.inner.accepts(start, end)
        }
    }

    #[test]
    fn test_search_prunes_disjoint_subtrees() {
        let mut index = AnnotationIndex::new();
        for i in 0..4096 {
            index.add(i * 10, i * 10 + 5, i).unwrap();
        }

        let visited = std::cell::Cell::new(0);
        let found: Vec<_> = index
            .search(CountingPruner {
                inner: Overlaps { from: 20_000, to: 20_030 },
                visited: &visited,
            })
            .map(|e| *e.value())
            .collect();

        assert_eq!(found, vec![2000, 2001, 2002]);
        // A full scan would visit all 4096 entries.
        assert!(visited.get() < 64, "visited {} entries", visited.get());
    }
}
