//! Document-level annotation layers for layered-span-index.
//!
//! This crate attaches span annotations, tokens and edges to a shared text
//! buffer. Each (layer, variant) pair is backed by its own
//! [`AnnotationIndex`](layered_span_index::AnnotationIndex).
//!
//! ## Core Types
//!
//! - [`SpanDocument`] - Text buffer with annotation layers
//! - [`LayerKey`] / [`AnnotationRef`] - Layer identity and annotation references
//! - [`EdgeIndex`] - Labeled edges between annotations
//! - [`DocumentConfig`] - RON-loadable configuration
//! - [`DocumentDisplay`] - Text rendering of annotations for snapshots
//!
//! ## Example
//!
//! ```
//! use layered_span_document::{LayerKey, SpanDocument};
//!
//! let mut doc = SpanDocument::new("The Supplier shall deliver the Goods.");
//! let ner = LayerKey::base("ner");
//! let party = doc.add(ner.clone(), 4, 12, "Party").unwrap();
//! doc.add(ner.clone(), 31, 36, "Goods").unwrap();
//!
//! assert_eq!(doc.annotation_text(&party), Some("Supplier"));
//! let inside: Vec<_> = doc.covered_by(&ner, 0, 20).unwrap().map(|e| *e.value()).collect();
//! assert_eq!(inside, vec!["Party"]);
//! ```

mod config;
mod display;
mod document;
mod edges;
mod errors;
mod layer;
pub mod relations;
mod tokens;

pub use config::DocumentConfig;
pub use display::DocumentDisplay;
pub use document::SpanDocument;
pub use edges::{Edge, EdgeIndex};
pub use errors::{DocumentError, DocumentResult};
pub use layer::{AnnotationRef, LayerKey};
pub use relations::{CoveredBy, Covering, WindowQuery};
pub use tokens::{Token, TokenKind};
