//! SVG minification.
//!
//! Works like the generic XML rewriter, and additionally drops processing
//! instructions, the DOCTYPE and the `version` attribute of `svg` elements,
//! and hands stylesheets to the CSS minifier of a [`Minifier`].

use std::io::{BufRead, Write};

use crate::Options;
use crate::buffer::TokenBuffer;
use crate::delegate::{CSS, INLINE_CSS, Minifier, minify_or_passthrough};
use crate::error::MarkminError;
use crate::escape::{CDataForm, escape_attr_val, escape_cdata_val};
use crate::markup::*;
use crate::token::{Token, TokenKind, TokenSource};
use crate::tokenizer::XmlTokenizer;
use crate::whitespace::{Collapser, is_all_whitespace};

/// Tag and attribute names that get special treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Name {
    Style,
    Svg,
    Version,
}

impl Name {
    fn from_bytes(b: &[u8]) -> Option<Self> {
        match b {
            b"style" => Some(Self::Style),
            b"svg" => Some(Self::Svg),
            b"version" => Some(Self::Version),
            _ => None,
        }
    }
}

/// Minify an SVG document read from `r` into `w`, delegating stylesheets to `m`.
pub fn minify<W: Write, R: BufRead>(
    m: &dyn Minifier,
    w: W,
    r: R,
    options: &Options,
) -> Result<(), MarkminError> {
    minify_tokens(m, w, XmlTokenizer::new(r), options)
}

/// Minify an already tokenized SVG document.
pub fn minify_tokens<W: Write, S: TokenSource>(
    m: &dyn Minifier,
    w: W,
    source: S,
    options: &Options,
) -> Result<(), MarkminError> {
    SvgMinifier {
        m,
        tb: TokenBuffer::new(source),
        w,
        escape_buf: Vec::with_capacity(64),
        minify_buf: Vec::with_capacity(64),
        collapser: Collapser::new(options.max_lookahead),
        tag: None,
        remove_processing_instructions: options.remove_processing_instructions,
        remove_version: options.remove_version,
    }
    .run()
}

struct SvgMinifier<'m, S, W> {
    m: &'m dyn Minifier,
    tb: TokenBuffer<S>,
    w: W,
    escape_buf: Vec<u8>,
    minify_buf: Vec<u8>,
    collapser: Collapser,
    /// The most recently opened element, if it is one we care about.
    tag: Option<Name>,
    remove_processing_instructions: bool,
    remove_version: bool,
}

impl<S: TokenSource, W: Write> SvgMinifier<'_, S, W> {
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
                TokenKind::Text => self.text(t.data)?,
                TokenKind::CData => {
                    self.w.write_all(CDATA_START)?;
                    if self.tag == Some(Name::Style) {
                        minify_or_passthrough(self.m, CSS, &mut self.w, &t.data)?;
                    } else {
                        self.w.write_all(&t.data)?;
                    }
                    self.w.write_all(CDATA_END)?;
                }
                TokenKind::StartTag => {
                    self.w.write_all(LT)?;
                    self.w.write_all(&t.data)?;
                    self.tag = Name::from_bytes(&t.data);
                }
                TokenKind::StartTagPI if self.remove_processing_instructions => {
                    self.skip_processing_instruction(&t);
                }
                TokenKind::StartTagPI => {
                    self.w.write_all(LT_PI)?;
                    self.w.write_all(&t.data)?;
                }
                TokenKind::StartTagClosePI => self.w.write_all(GT_PI)?,
                TokenKind::Attribute => self.attribute(&t)?,
                TokenKind::StartTagClose => close_start_tag(&mut self.tb, &mut self.w)?,
                TokenKind::StartTagCloseVoid => self.w.write_all(VOID)?,
                TokenKind::EndTag => write_end_tag(&mut self.w, &t)?,
                TokenKind::DocType => {
                    log::debug!(target: "markmin::svg", "dropping DOCTYPE");
                }
                TokenKind::Comment => {}
            }
        }
    }

    fn text(&mut self, mut data: Vec<u8>) -> Result<(), MarkminError> {
        if self.tag == Some(Name::Style) && !is_all_whitespace(&data) {
            self.collapser.wrote_verbatim();
            return minify_or_passthrough(self.m, CSS, &mut self.w, &data);
        }
        let text = self.collapser.collapse(&mut self.tb, &mut data)?;
        self.w.write_all(text)?;
        Ok(())
    }

    /// Drop a processing instruction along with its attributes.
    fn skip_processing_instruction(&mut self, t: &Token) {
        log::debug!(
            target: "markmin::svg",
            "dropping processing instruction {}",
            String::from_utf8_lossy(&t.data)
        );
        loop {
            match self.tb.shift().kind {
                TokenKind::StartTagClosePI | TokenKind::Error => break,
                _ => {}
            }
        }
    }

    fn attribute(&mut self, t: &Token) -> Result<(), MarkminError> {
        let Some(mut val) = attr_value(t) else {
            return Ok(());
        };
        let attr = Name::from_bytes(&t.data);
        if self.remove_version && self.tag == Some(Name::Svg) && attr == Some(Name::Version) {
            log::debug!(target: "markmin::svg", "dropping version attribute");
            return Ok(());
        }

        write_attr_name(&mut self.w, t)?;
        if attr == Some(Name::Style) {
            self.minify_buf.clear();
            match self.m.minify(INLINE_CSS, &mut self.minify_buf, val) {
                Ok(()) => val = &self.minify_buf,
                Err(e) => log::debug!(target: "markmin::svg", "keeping style attribute: {e}"),
            }
        }
        let val = escape_attr_val(&mut self.escape_buf, val);
        self.w.write_all(val)?;
        Ok(())
    }
}
