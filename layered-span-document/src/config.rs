//! Document configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DocumentError, DocumentResult, LayerKey};

/// Configuration for a [`SpanDocument`](crate::SpanDocument).
///
/// Usually written in RON:
///
/// ```
/// use layered_span_document::{DocumentConfig, LayerKey};
///
/// let config = DocumentConfig::from_ron(r#"(
///     strict_layers: true,
///     layers: [(layer: "ner", variant: "gold"), (layer: "clause")],
/// )"#).unwrap();
///
/// assert!(config.tokenize);
/// assert_eq!(config.layers[1], LayerKey::base("clause"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Build the token layer from the text.
    pub tokenize: bool,
    /// Reject annotations for layers not listed in `layers`.
    pub strict_layers: bool,
    /// Run the full balance check after every mutation and log failures.
    pub verify_balance: bool,
    /// Layers registered up front.
    pub layers: Vec<LayerKey>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            tokenize: true,
            strict_layers: false,
            verify_balance: false,
            layers: Vec::new(),
        }
    }
}

impl DocumentConfig {
    /// Parse a configuration from RON text.
    pub fn from_ron(source: &str) -> DocumentResult<Self> {
        Ok(ron::from_str(source)?)
    }

    /// Load a RON configuration file.
    pub fn load(path: &Path) -> DocumentResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&content)
    }

    /// Builder-style layer registration.
    pub fn with_layer(mut self, key: LayerKey) -> Self {
        self.layers.push(key);
        self
    }
}
