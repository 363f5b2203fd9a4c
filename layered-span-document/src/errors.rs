//! Error types for document operations.

use layered_span_index::IndexError;
use thiserror::Error;

use crate::{AnnotationRef, LayerKey};

/// Errors that can occur while building or querying a [`SpanDocument`](crate::SpanDocument).
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Error from the underlying interval index.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The layer is not registered and the document uses strict layers.
    #[error("unknown layer: {0}")]
    UnknownLayer(LayerKey),

    /// The span does not lie inside the text on character boundaries.
    #[error("span {from}..{to} is outside the text (length {len}) or splits a character")]
    OutOfBounds { from: usize, to: usize, len: usize },

    /// An edge endpoint does not refer to a live annotation.
    #[error("edge endpoint is not a live annotation: {0:?}")]
    DanglingEdge(AnnotationRef),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
