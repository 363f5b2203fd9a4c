//! Error types for index mutation and navigation.

use thiserror::Error;

use crate::EntryHandle;

/// Errors returned by [`AnnotationIndex`](crate::AnnotationIndex) and
/// [`AnnotationNavigator`](crate::AnnotationNavigator).
///
/// Every error is raised before the tree is touched, so the index is left
/// in its previous (balanced) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// `add` was called with `start > end`.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    /// The handle is not live in this index (removed, or from another index).
    #[error("entry not found: {0:?}")]
    NotFound(EntryHandle),

    /// The handle belongs to this index but its entry has since been removed.
    #[error("stale handle: {0:?} refers to a removed entry")]
    StaleHandle(EntryHandle),

    /// A navigator accessor was called without a current position.
    #[error("navigator has no current position")]
    NoCurrentPosition,
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
