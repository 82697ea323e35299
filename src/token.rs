//! Flat markup tokens, as produced by a tokenizer and consumed by the rewriters.

use crate::error::MarkminError;

/// Kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name`
    StartTag,
    /// `>` ending a start tag
    StartTagClose,
    /// `/>` ending a start tag
    StartTagCloseVoid,
    /// `<?target`
    StartTagPI,
    /// `?>`
    StartTagClosePI,
    /// `</name>`
    EndTag,
    /// `name="value"` inside a start tag or processing instruction
    Attribute,
    Text,
    CData,
    Comment,
    DocType,
    /// Terminal token: end of stream or tokenizer failure.
    Error,
}

/// A single token of the markup stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Tag name, attribute name, or text content, as raw bytes.
    pub data: Vec<u8>,
    /// Attribute value including its surrounding quotes; empty when the
    /// attribute had no value or for any other kind.
    pub attr_val: Vec<u8>,
}

impl Token {
    pub fn new(kind: TokenKind, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
            attr_val: Vec::new(),
        }
    }

    pub fn attribute(name: impl Into<Vec<u8>>, attr_val: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: TokenKind::Attribute,
            data: name.into(),
            attr_val: attr_val.into(),
        }
    }

    pub fn error() -> Self {
        Self::new(TokenKind::Error, Vec::new())
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// A pull source of tokens in document order.
pub trait TokenSource {
    /// Pull the next token. `Ok(None)` signals the end of the stream.
    fn next_token(&mut self) -> Result<Option<Token>, MarkminError>;
}

impl TokenSource for std::vec::IntoIter<Token> {
    fn next_token(&mut self) -> Result<Option<Token>, MarkminError> {
        Ok(self.next())
    }
}
