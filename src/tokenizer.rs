//! Markup tokenizing on top of quick-xml.

use std::collections::VecDeque;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::attributes::Attributes;
use quick_xml::events::{BytesStart, Event};

use crate::error::MarkminError;
use crate::token::{Token, TokenKind, TokenSource};

/// Splits quick-xml events into the flat token stream.
///
/// A start tag becomes `StartTag`, one `Attribute` per attribute, then
/// `StartTagClose` or `StartTagCloseVoid`. The XML declaration and other
/// processing instructions become `StartTagPI`, attributes, `StartTagClosePI`.
pub struct XmlTokenizer<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending: VecDeque<Token>,
}

impl<R: BufRead> XmlTokenizer<R> {
    pub fn new(input: R) -> Self {
        Self {
            reader: Reader::from_reader(input),
            buf: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Read one event into `pending`. Returns `false` at end of input.
    fn read(&mut self) -> Result<bool, MarkminError> {
        self.buf.clear();
        match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(start) => {
                push_start(&mut self.pending, &start)?;
                self.pending
                    .push_back(Token::new(TokenKind::StartTagClose, Vec::new()));
            }
            Event::Empty(start) => {
                push_start(&mut self.pending, &start)?;
                self.pending
                    .push_back(Token::new(TokenKind::StartTagCloseVoid, Vec::new()));
            }
            Event::End(end) => {
                self.pending
                    .push_back(Token::new(TokenKind::EndTag, end.name().as_ref()));
            }
            Event::Text(text) => {
                if !text.is_empty() {
                    self.pending
                        .push_back(Token::new(TokenKind::Text, text.into_inner()));
                }
            }
            Event::CData(cdata) => {
                self.pending
                    .push_back(Token::new(TokenKind::CData, cdata.into_inner()));
            }
            Event::Comment(comment) => {
                self.pending
                    .push_back(Token::new(TokenKind::Comment, comment.into_inner()));
            }
            Event::DocType(doctype) => {
                self.pending
                    .push_back(Token::new(TokenKind::DocType, doctype.trim_ascii()));
            }
            Event::Decl(decl) => push_instruction(&mut self.pending, &decl),
            Event::PI(pi) => push_instruction(&mut self.pending, &pi),
            Event::Eof => return Ok(false),
        }
        Ok(true)
    }
}

impl<R: BufRead> TokenSource for XmlTokenizer<R> {
    fn next_token(&mut self) -> Result<Option<Token>, MarkminError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            if !self.read()? {
                return Ok(None);
            }
        }
    }
}

fn push_start(pending: &mut VecDeque<Token>, start: &BytesStart) -> Result<(), MarkminError> {
    pending.push_back(Token::new(TokenKind::StartTag, start.name().as_ref()));
    push_attributes(pending, start.attributes())
}

/// `content` is everything between `<?` and `?>`: the target, then attribute-like pairs.
///
/// A body that does not split that way is kept whole as the `StartTagPI` data.
fn push_instruction(pending: &mut VecDeque<Token>, content: &[u8]) {
    match instruction_tokens(content) {
        Ok(tokens) => pending.extend(tokens),
        Err(e) => {
            log::debug!(
                target: "markmin::tokenizer",
                "keeping processing instruction body raw: {e}"
            );
            pending.push_back(Token::new(TokenKind::StartTagPI, content));
        }
    }
    pending.push_back(Token::new(TokenKind::StartTagClosePI, Vec::new()));
}

fn instruction_tokens(content: &[u8]) -> Result<Vec<Token>, MarkminError> {
    let content = std::str::from_utf8(content)?;
    let target_len = content
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(content.len());

    let mut tokens = VecDeque::new();
    tokens.push_back(Token::new(TokenKind::StartTagPI, &content[..target_len]));
    let start = BytesStart::from_content(content, target_len);
    push_attributes(&mut tokens, start.attributes())?;
    Ok(tokens.into())
}

fn push_attributes(pending: &mut VecDeque<Token>, mut attrs: Attributes) -> Result<(), MarkminError> {
    attrs.with_checks(false);
    for attr in attrs {
        let attr = attr?;
        // quick-xml strips the quotes; the rewriters pick their own delimiter anyway.
        let mut attr_val = Vec::with_capacity(attr.value.len() + 2);
        attr_val.push(b'"');
        attr_val.extend_from_slice(&attr.value);
        attr_val.push(b'"');
        pending.push_back(Token::attribute(attr.key.as_ref(), attr_val));
    }
    Ok(())
}
