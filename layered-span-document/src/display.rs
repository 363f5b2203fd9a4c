use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::{LayerKey, SpanDocument};

// Text first, then one line per annotation, aligned by display column:
//
// The Supplier shall
//     ╰──────╯ Party
// ╰────────────────╯ Clause
//
// A zero- or one-column span is drawn as a single `╰`.
pub struct DocumentDisplay<'a, V> {
    doc: &'a SpanDocument<V>,
    layers: Vec<LayerKey>,
    tokens: bool,
}

impl<'a, V> DocumentDisplay<'a, V> {
    pub fn new(doc: &'a SpanDocument<V>) -> Self {
        Self {
            doc,
            layers: Vec::new(),
            tokens: false,
        }
    }

    /// Draw the annotations of a layer, in the order layers are included.
    pub fn include(&mut self, key: LayerKey) -> &mut Self {
        self.layers.push(key);
        self
    }

    /// Draw the token layer before any included layer.
    pub fn include_tokens(&mut self) -> &mut Self {
        self.tokens = true;
        self
    }

    /// Display column of byte `offset`. Control characters take one column.
    fn column(&self, offset: usize) -> usize {
        let text = self.doc.text();
        text.get(..offset)
            .unwrap_or(text)
            .chars()
            .map(|c| if c.is_control() { 1 } else { c.width().unwrap_or(0) })
            .sum()
    }

    fn write_marker(&self, f: &mut fmt::Formatter<'_>, start: usize, end: usize, label: &dyn fmt::Debug) -> fmt::Result {
        let from = self.column(start);
        let width = self.column(end).saturating_sub(from);

        let mut line = " ".repeat(from);
        if width <= 1 {
            line.push_str("╰ ");
        } else {
            line.push('╰');
            line.extend(std::iter::repeat('─').take(width - 2));
            line.push_str("╯ ");
        }
        writeln!(f, "{}{:?}", line, label)
    }
}

impl<'a, V: fmt::Debug> fmt::Display for DocumentDisplay<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opening: String = self
            .doc
            .text()
            .chars()
            .map(|c| if c.is_control() { '↵' } else { c })
            .collect();
        writeln!(f, "{}", opening)?;

        if self.tokens {
            for token in self.doc.tokens().entries() {
                if token.value().kind != crate::TokenKind::Whitespace {
                    self.write_marker(f, token.start(), token.end(), &token.value().kind)?;
                }
            }
        }

        for key in &self.layers {
            if let Some(index) = self.doc.layer(key) {
                for entry in index.entries() {
                    self.write_marker(f, entry.start(), entry.end(), entry.value())?;
                }
            }
        }

        Ok(())
    }
}
