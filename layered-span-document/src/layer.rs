//! Layer identity and references to annotations inside a layer.

use std::fmt;

use layered_span_index::EntryHandle;
use serde::{Deserialize, Serialize};

/// Identifies one annotation layer of a document.
///
/// A layer (e.g. `"ner"`) may have several variants (e.g. `"gold"` and
/// `"predicted"`), each backed by its own index. The base variant is the
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerKey {
    pub layer: String,
    #[serde(default)]
    pub variant: String,
}

impl LayerKey {
    pub fn new(layer: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            variant: variant.into(),
        }
    }

    /// The base variant of `layer`.
    pub fn base(layer: impl Into<String>) -> Self {
        Self::new(layer, String::new())
    }

    pub fn is_base(&self) -> bool {
        self.variant.is_empty()
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_base() {
            write!(f, "{}", self.layer)
        } else {
            write!(f, "{}/{}", self.layer, self.variant)
        }
    }
}

/// A live annotation: its layer plus its handle in that layer's index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationRef {
    pub key: LayerKey,
    pub handle: EntryHandle,
}

impl AnnotationRef {
    pub fn new(key: LayerKey, handle: EntryHandle) -> Self {
        Self { key, handle }
    }
}
