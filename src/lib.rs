#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Balanced interval index for span annotations.
//!
//! Every span query in a layered document (covered-by, covering, overlap,
//! window, nearest neighbor) is answered by an [`AnnotationIndex`]: an AVL
//! tree of half-open ranges `[start, end)` keyed by `(start, sequence)` and
//! augmented with the largest `end` of each subtree.
//!
//! ## Core Types
//!
//! - [`AnnotationIndex`] - insertion, identity-based removal, ascending
//!   iteration, exact-range and overlap lookup
//! - [`Entry`] / [`EntryHandle`] - a stored range with its value, and its
//!   opaque identity
//! - [`AnnotationNavigator`] - bidirectional cursor with floor/ceiling seeks
//! - [`Pruner`] - hook for custom augmented searches
//!
//! ## Example
//!
//! ```
//! use layered_span_index::AnnotationIndex;
//!
//! let mut index = AnnotationIndex::new();
//! let sentence = index.add(0, 24, "sentence").unwrap();
//! index.add(4, 9, "noun").unwrap();
//! index.add(10, 15, "verb").unwrap();
//!
//! let hits: Vec<_> = index.overlap_entries(8, 11).map(|e| *e.value()).collect();
//! assert_eq!(hits, vec!["sentence", "noun", "verb"]);
//!
//! index.remove(sentence).unwrap();
//! assert_eq!(index.len(), 2);
//! ```

mod errors;
mod index;

pub use errors::{IndexError, IndexResult};
pub use index::{
    AnnotationIndex, AnnotationNavigator, CoverEntries, Entries, Entry, EntryHandle, IndexId,
    Overlaps, Pruner, SearchEntries,
};

#[cfg(test)]
mod tests;
