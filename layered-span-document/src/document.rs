//! A text buffer with layered span annotations.
//!
//! Each (layer, variant) pair owns one [`AnnotationIndex`]. Annotations are
//! byte ranges over the shared text; tokens live in their own index built
//! from the text, and edges link annotations across layers.

use std::collections::BTreeMap;

use layered_span_index::{AnnotationIndex, Entry, IndexError, Overlaps, SearchEntries};

use crate::edges::{Edge, EdgeIndex};
use crate::relations::{self, CoveredBy, Covering, WindowQuery};
use crate::tokens::{self, Token};
use crate::{AnnotationRef, DocumentConfig, DocumentError, DocumentResult, LayerKey};

/// A document composed of a text buffer and annotation layers.
pub struct SpanDocument<V> {
    text: String,
    config: DocumentConfig,
    layers: BTreeMap<LayerKey, AnnotationIndex<V>>,
    tokens: AnnotationIndex<Token>,
    edges: EdgeIndex,
}

impl<V> std::fmt::Debug for SpanDocument<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanDocument")
            .field("text_len", &self.text.len())
            .field("layers", &self.layers.keys().collect::<Vec<_>>())
            .field("tokens", &self.tokens.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

impl<V> SpanDocument<V> {
    /// Create a document with the default configuration.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_config(text, DocumentConfig::default())
    }

    pub fn with_config(text: impl Into<String>, config: DocumentConfig) -> Self {
        let text = text.into();
        let tokens = if config.tokenize {
            tokens::tokenize(&text)
        } else {
            AnnotationIndex::new()
        };
        let layers = config
            .layers
            .iter()
            .map(|key| (key.clone(), AnnotationIndex::new()))
            .collect();

        Self {
            text,
            config,
            layers,
            tokens,
            edges: EdgeIndex::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// The text of `[from, to)`, if it lies on character boundaries.
    pub fn slice(&self, from: usize, to: usize) -> Option<&str> {
        self.text.get(from..to)
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    /// Register a layer, returning its index. Existing layers are kept.
    pub fn register_layer(&mut self, key: LayerKey) -> &mut AnnotationIndex<V> {
        self.layers.entry(key).or_default()
    }

    pub fn layer(&self, key: &LayerKey) -> Option<&AnnotationIndex<V>> {
        self.layers.get(key)
    }

    /// All registered layers in key order.
    pub fn layers(&self) -> impl Iterator<Item = (&LayerKey, &AnnotationIndex<V>)> {
        self.layers.iter()
    }

    fn require_layer(&self, key: &LayerKey) -> DocumentResult<&AnnotationIndex<V>> {
        self.layers
            .get(key)
            .ok_or_else(|| DocumentError::UnknownLayer(key.clone()))
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    fn check_span(&self, from: usize, to: usize) -> DocumentResult<()> {
        if from > to {
            return Err(IndexError::InvalidRange { start: from, end: to }.into());
        }
        if self.slice(from, to).is_none() {
            return Err(DocumentError::OutOfBounds {
                from,
                to,
                len: self.text.len(),
            });
        }
        Ok(())
    }

    /// Annotate `[from, to)` in layer `key`.
    ///
    /// Unknown layers are registered on first use unless the configuration
    /// asks for strict layers.
    pub fn add(&mut self, key: LayerKey, from: usize, to: usize, value: V) -> DocumentResult<AnnotationRef> {
        self.check_span(from, to)?;
        if self.config.strict_layers && !self.layers.contains_key(&key) {
            tracing::debug!(layer = %key, "rejecting annotation for unregistered layer");
            return Err(DocumentError::UnknownLayer(key));
        }

        let index = self.layers.entry(key.clone()).or_default();
        let handle = index.add(from, to, value)?;
        let annotation = AnnotationRef::new(key, handle);
        self.after_mutation(&annotation.key);
        Ok(annotation)
    }

    /// Remove an annotation and every edge touching it.
    pub fn remove(&mut self, annotation: &AnnotationRef) -> DocumentResult<V> {
        let index = self
            .layers
            .get_mut(&annotation.key)
            .ok_or_else(|| DocumentError::UnknownLayer(annotation.key.clone()))?;
        let value = index.remove(annotation.handle)?;

        let dropped = self.edges.detach(annotation);
        if dropped > 0 {
            tracing::debug!(layer = %annotation.key, dropped, "dropped edges of removed annotation");
        }
        self.after_mutation(&annotation.key);
        Ok(value)
    }

    fn after_mutation(&self, key: &LayerKey) {
        if !self.config.verify_balance {
            return;
        }
        if let Some(index) = self.layers.get(key) {
            if !index.verify_balance() {
                tracing::error!(layer = %key, len = index.len(), "annotation index lost balance");
            }
        }
    }

    pub fn get(&self, annotation: &AnnotationRef) -> Option<&Entry<V>> {
        self.layers.get(&annotation.key)?.get(annotation.handle)
    }

    /// The text covered by an annotation.
    pub fn annotation_text(&self, annotation: &AnnotationRef) -> Option<&str> {
        let entry = self.get(annotation)?;
        self.slice(entry.start(), entry.end())
    }

    // ------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------

    pub fn tokens(&self) -> &AnnotationIndex<Token> {
        &self.tokens
    }

    /// Tokens covered by `[from, to)`.
    pub fn tokens_in(&self, from: usize, to: usize) -> SearchEntries<'_, Token, CoveredBy> {
        relations::covered_by(&self.tokens, from, to)
    }

    pub fn token_text(&self, token: &Entry<Token>) -> Option<&str> {
        self.slice(token.start(), token.end())
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Add a labeled edge from `source` to `target`. Both must be live.
    pub fn link(&mut self, label: &str, source: &AnnotationRef, target: &AnnotationRef) -> DocumentResult<()> {
        for end in [source, target] {
            if self.get(end).is_none() {
                return Err(DocumentError::DanglingEdge(end.clone()));
            }
        }
        self.edges.insert(label, source.clone(), target.clone());
        Ok(())
    }

    pub fn edges(&self) -> &EdgeIndex {
        &self.edges
    }

    pub fn outgoing(&self, annotation: &AnnotationRef) -> &[Edge] {
        self.edges.outgoing(annotation)
    }

    pub fn incoming(&self, annotation: &AnnotationRef) -> &[Edge] {
        self.edges.incoming(annotation)
    }

    // ------------------------------------------------------------------
    // Relations
    // ------------------------------------------------------------------

    pub fn covered_by(
        &self,
        key: &LayerKey,
        from: usize,
        to: usize,
    ) -> DocumentResult<SearchEntries<'_, V, CoveredBy>> {
        Ok(relations::covered_by(self.require_layer(key)?, from, to))
    }

    pub fn covering(
        &self,
        key: &LayerKey,
        from: usize,
        to: usize,
    ) -> DocumentResult<SearchEntries<'_, V, Covering>> {
        Ok(relations::covering(self.require_layer(key)?, from, to))
    }

    pub fn intersects(
        &self,
        key: &LayerKey,
        from: usize,
        to: usize,
    ) -> DocumentResult<SearchEntries<'_, V, Overlaps>> {
        Ok(relations::intersects(self.require_layer(key)?, from, to))
    }

    pub fn in_window(
        &self,
        key: &LayerKey,
        query: WindowQuery,
    ) -> DocumentResult<impl Iterator<Item = &Entry<V>>> {
        Ok(relations::in_window(self.require_layer(key)?, query))
    }

    pub fn nearest_before(&self, key: &LayerKey, pos: usize) -> DocumentResult<Option<&Entry<V>>> {
        Ok(relations::nearest_before(self.require_layer(key)?, pos))
    }

    pub fn nearest_after(&self, key: &LayerKey, pos: usize) -> DocumentResult<Option<&Entry<V>>> {
        Ok(relations::nearest_after(self.require_layer(key)?, pos))
    }
}
