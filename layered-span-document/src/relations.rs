//! Span relations composed from index searches.
//!
//! All relations treat spans as half-open `[start, end)` byte ranges.
//!
//! ```text
//!   query              [from ─────────── to)
//!   covered_by              [───)   [)
//!   covering         [───────────────────────)
//!   intersects   [──────)                [──────)
//! ```

use layered_span_index::{AnnotationIndex, Entry, Overlaps, Pruner, SearchEntries};

/// Entries inside the query: `from <= start && end <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoveredBy {
    pub from: usize,
    pub to: usize,
}

impl Pruner for CoveredBy {
    fn descend(&self, max_end: usize) -> bool {
        // A contained entry ends at or after `from`.
        max_end >= self.from
    }

    fn exhausted(&self, start: usize) -> bool {
        start > self.to
    }

    fn accepts(&self, start: usize, end: usize) -> bool {
        start >= self.from && end <= self.to
    }
}

/// Entries containing the query: `start <= from && to <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Covering {
    pub from: usize,
    pub to: usize,
}

impl Pruner for Covering {
    fn descend(&self, max_end: usize) -> bool {
        max_end >= self.to
    }

    fn exhausted(&self, start: usize) -> bool {
        start > self.from
    }

    fn accepts(&self, start: usize, end: usize) -> bool {
        start <= self.from && end >= self.to
    }
}

/// Entries covered by `[from, to)`, zero-length entries included.
pub fn covered_by<V>(index: &AnnotationIndex<V>, from: usize, to: usize) -> SearchEntries<'_, V, CoveredBy> {
    index.search(CoveredBy { from, to })
}

/// Entries covering `[from, to)`.
pub fn covering<V>(index: &AnnotationIndex<V>, from: usize, to: usize) -> SearchEntries<'_, V, Covering> {
    index.search(Covering { from, to })
}

/// Entries overlapping `[from, to)`.
pub fn intersects<V>(index: &AnnotationIndex<V>, from: usize, to: usize) -> SearchEntries<'_, V, Overlaps> {
    index.overlap_entries(from, to)
}

/// A span widened by `radius` on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowQuery {
    pub from: usize,
    pub to: usize,
    pub radius: usize,
    /// Skip entries whose range is exactly `[from, to)`.
    pub exclude_self: bool,
}

impl WindowQuery {
    pub fn new(from: usize, to: usize, radius: usize) -> Self {
        Self {
            from,
            to,
            radius,
            exclude_self: false,
        }
    }

    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }

    /// The widened bounds, saturating at zero.
    pub fn bounds(&self) -> (usize, usize) {
        (
            self.from.saturating_sub(self.radius),
            self.to.saturating_add(self.radius),
        )
    }
}

/// Entries covered by the query span widened by its radius.
pub fn in_window<V>(index: &AnnotationIndex<V>, query: WindowQuery) -> impl Iterator<Item = &Entry<V>> {
    let (from, to) = query.bounds();
    covered_by(index, from, to).filter(move |entry| {
        !(query.exclude_self && entry.start() == query.from && entry.end() == query.to)
    })
}

/// The entry ending at or before `pos` with the greatest start; among equal
/// starts, the latest inserted.
///
/// Walks backwards from the floor of `pos`, so long spans reaching past
/// `pos` are stepped over one at a time. This is linear in the number of
/// entries that start before `pos` and end after it; the `max_end`
/// augmentation bounds ends from above and cannot prune them.
pub fn nearest_before<V>(index: &AnnotationIndex<V>, pos: usize) -> Option<&Entry<V>> {
    let mut nav = index.navigator();
    if !nav.seek_floor(pos) {
        return None;
    }
    loop {
        let entry = nav.current().ok()?;
        if entry.end() <= pos {
            return Some(entry);
        }
        if !nav.move_prev() {
            return None;
        }
    }
}

/// The first entry starting at or after `pos`.
pub fn nearest_after<V>(index: &AnnotationIndex<V>, pos: usize) -> Option<&Entry<V>> {
    let mut nav = index.navigator();
    if nav.seek_ceiling(pos) {
        nav.current().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnnotationIndex<&'static str> {
        AnnotationIndex::try_from_iter(vec![
            (0, 40, "sentence"),
            (0, 3, "Pay"),
            (4, 7, "the"),
            (4, 11, "the fee"),
            (8, 11, "fee"),
            (11, 11, "caret"),
            (12, 20, "promptly"),
        ])
        .unwrap()
    }

    fn values<'a>(iter: impl Iterator<Item = &'a Entry<&'static str>>) -> Vec<&'static str> {
        iter.map(|e| *e.value()).collect()
    }

    #[test]
    fn test_covered_by() {
        let index = sample();
        assert_eq!(values(covered_by(&index, 4, 11)), vec!["the", "the fee", "fee", "caret"]);
        assert_eq!(values(covered_by(&index, 0, 3)), vec!["Pay"]);
        assert!(values(covered_by(&index, 1, 3)).is_empty());
    }

    #[test]
    fn test_covering() {
        let index = sample();
        assert_eq!(values(covering(&index, 8, 11)), vec!["sentence", "the fee", "fee"]);
        assert_eq!(values(covering(&index, 11, 11)), vec!["sentence", "the fee", "fee", "caret"]);
        assert!(values(covering(&index, 30, 45)).is_empty());
    }

    #[test]
    fn test_intersects() {
        let index = sample();
        assert_eq!(values(intersects(&index, 6, 9)), vec!["sentence", "the", "the fee", "fee"]);
    }

    #[test]
    fn test_in_window() {
        let index = sample();
        let query = WindowQuery::new(8, 11, 4);
        assert_eq!(query.bounds(), (4, 15));
        assert_eq!(values(in_window(&index, query)), vec!["the", "the fee", "fee", "caret"]);
        assert_eq!(
            values(in_window(&index, query.excluding_self())),
            vec!["the", "the fee", "caret"]
        );
        assert_eq!(WindowQuery::new(2, 3, 5).bounds(), (0, 8));
    }

    #[test]
    fn test_nearest_neighbors() {
        let index = sample();
        assert_eq!(nearest_before(&index, 12).map(|e| *e.value()), Some("caret"));
        assert_eq!(nearest_before(&index, 7).map(|e| *e.value()), Some("the"));
        assert!(nearest_before(&index, 2).is_none());
        assert_eq!(nearest_after(&index, 5).map(|e| *e.value()), Some("fee"));
        assert_eq!(nearest_after(&index, 12).map(|e| *e.value()), Some("promptly"));
        assert!(nearest_after(&index, 13).is_none());
    }

    #[test]
    fn test_nearest_before_steps_over_long_spans() {
        let mut index = AnnotationIndex::new();
        index.add(0, 2, "short").unwrap();
        for start in 3..200 {
            index.add(start, 500, "long").unwrap();
        }
        index.add(100, 120, "inner").unwrap();

        assert_eq!(nearest_before(&index, 250).map(|e| *e.value()), Some("inner"));
        assert_eq!(nearest_before(&index, 110).map(|e| *e.value()), Some("short"));
        assert!(nearest_before(&index, 1).is_none());
    }
}
