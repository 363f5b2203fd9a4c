//! Token layer built from UAX #29 word boundaries.

use layered_span_index::AnnotationIndex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Word,
    Number,
    Whitespace,
    Punctuation,
    Symbol,
}

/// Token metadata stored in the token layer. The text is recovered from the
/// document through the entry's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
}

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '!' | '"' | '#' | '%' | '&' | '\'' | '(' | ')' | '*' | ',' | '-' | '.' | '/' | ':' | ';'
            | '?' | '@' | '[' | '\\' | ']' | '_' | '{' | '}' | '¡' | '§' | '¶' | '¿' | '‐'
            | '–' | '—' | '‘' | '’' | '“' | '”' | '…'
    )
}

fn classify(piece: &str) -> TokenKind {
    if piece.chars().all(char::is_whitespace) {
        TokenKind::Whitespace
    } else if piece.chars().any(char::is_numeric)
        && piece.chars().all(|c| c.is_numeric() || c == '.' || c == ',')
    {
        TokenKind::Number
    } else if piece.chars().any(char::is_alphanumeric) {
        TokenKind::Word
    } else if piece.chars().all(is_punctuation) {
        TokenKind::Punctuation
    } else {
        TokenKind::Symbol
    }
}

/// Split `text` on word boundaries into a token index keyed by byte offset.
pub(crate) fn tokenize(text: &str) -> AnnotationIndex<Token> {
    let mut index = AnnotationIndex::new();
    for (offset, piece) in text.split_word_bound_indices() {
        let token = Token {
            kind: classify(piece),
        };
        // Offsets come from the text itself, so the range is never inverted.
        if let Err(err) = index.add(offset, offset + piece.len(), token) {
            tracing::warn!(%err, offset, "skipping token");
        }
    }
    tracing::debug!(tokens = index.len(), bytes = text.len(), "tokenized text");
    index
}
