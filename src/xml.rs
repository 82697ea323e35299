//! Generic XML minification.

use std::io::{BufRead, Write};

use crate::Options;
use crate::buffer::TokenBuffer;
use crate::error::MarkminError;
use crate::escape::{CDataForm, escape_attr_val, escape_cdata_val};
use crate::markup::*;
use crate::token::{TokenKind, TokenSource};
use crate::tokenizer::XmlTokenizer;
use crate::whitespace::Collapser;

/// Minify an XML document read from `r` into `w`.
///
/// Whitespace in text is collapsed, empty elements become self-closing,
/// comments are removed and attribute quotes are normalized. Output is
/// written as it is produced; on error `w` holds a partial document.
pub fn minify<W: Write, R: BufRead>(w: W, r: R, options: &Options) -> Result<(), MarkminError> {
    minify_tokens(w, XmlTokenizer::new(r), options)
}

/// Minify an already tokenized XML document.
pub fn minify_tokens<W: Write, S: TokenSource>(
    w: W,
    source: S,
    options: &Options,
) -> Result<(), MarkminError> {
    XmlMinifier {
        tb: TokenBuffer::new(source),
        w,
        escape_buf: Vec::with_capacity(64),
        collapser: Collapser::new(options.max_lookahead),
    }
    .run()
}

struct XmlMinifier<S, W> {
    tb: TokenBuffer<S>,
    w: W,
    escape_buf: Vec<u8>,
    collapser: Collapser,
}

impl<S: TokenSource, W: Write> XmlMinifier<S, W> {
    fn run(mut self) -> Result<(), MarkminError> {
        loop {
            let mut t = self.tb.shift();
            if t.is(TokenKind::CData)
                && escape_cdata_val(&mut self.escape_buf, &t.data) == CDataForm::Escaped
            {
                std::mem::swap(&mut t.data, &mut self.escape_buf);
                t.kind = TokenKind::Text;
            }

            match t.kind {
                TokenKind::Error => return self.tb.finish(),
                TokenKind::DocType => {
                    self.w.write_all(DOCTYPE)?;
                    self.w.write_all(&t.data)?;
                    self.w.write_all(GT)?;
                }
                TokenKind::CData => {
                    self.w.write_all(CDATA_START)?;
                    self.w.write_all(&t.data)?;
                    self.w.write_all(CDATA_END)?;
                }
                TokenKind::Text => {
                    let text = self.collapser.collapse(&mut self.tb, &mut t.data)?;
                    self.w.write_all(text)?;
                }
                TokenKind::StartTag => {
                    self.w.write_all(LT)?;
                    self.w.write_all(&t.data)?;
                }
                TokenKind::StartTagPI => {
                    self.w.write_all(LT_PI)?;
                    self.w.write_all(&t.data)?;
                }
                TokenKind::Attribute => {
                    if let Some(val) = attr_value(&t) {
                        write_attr_name(&mut self.w, &t)?;
                        let val = escape_attr_val(&mut self.escape_buf, val);
                        self.w.write_all(val)?;
                    }
                }
                TokenKind::StartTagClose => close_start_tag(&mut self.tb, &mut self.w)?,
                TokenKind::StartTagCloseVoid => self.w.write_all(VOID)?,
                TokenKind::StartTagClosePI => self.w.write_all(GT_PI)?,
                TokenKind::EndTag => write_end_tag(&mut self.w, &t)?,
                TokenKind::Comment => {}
            }
        }
    }
}
