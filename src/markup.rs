//! Serialization pieces shared by the XML and SVG rewriters.

use std::io::Write;

use crate::buffer::TokenBuffer;
use crate::error::MarkminError;
use crate::token::{Token, TokenKind, TokenSource};
use crate::whitespace::is_all_whitespace;

pub(crate) const LT: &[u8] = b"<";
pub(crate) const GT: &[u8] = b">";
pub(crate) const VOID: &[u8] = b"/>";
pub(crate) const LT_PI: &[u8] = b"<?";
pub(crate) const GT_PI: &[u8] = b"?>";
pub(crate) const END: &[u8] = b"</";
pub(crate) const DOCTYPE: &[u8] = b"<!DOCTYPE ";
pub(crate) const CDATA_START: &[u8] = b"<![CDATA[";
pub(crate) const CDATA_END: &[u8] = b"]]>";

/// Finish a start tag. When only whitespace separates it from its end tag,
/// both are consumed and the element is written as `/>`.
pub(crate) fn close_start_tag<S: TokenSource, W: Write>(
    tb: &mut TokenBuffer<S>,
    w: &mut W,
) -> Result<(), MarkminError> {
    let next = tb.peek(0);
    let ahead = usize::from(next.is(TokenKind::Text) && is_all_whitespace(&next.data));
    if tb.peek(ahead).is(TokenKind::EndTag) {
        for _ in 0..=ahead {
            tb.shift();
        }
        w.write_all(VOID)?;
    } else {
        w.write_all(GT)?;
    }
    Ok(())
}

pub(crate) fn write_end_tag<W: Write>(w: &mut W, t: &Token) -> Result<(), MarkminError> {
    w.write_all(END)?;
    w.write_all(&t.data)?;
    w.write_all(GT)?;
    Ok(())
}

/// ` name=` ahead of an attribute value.
pub(crate) fn write_attr_name<W: Write>(w: &mut W, t: &Token) -> Result<(), MarkminError> {
    w.write_all(b" ")?;
    w.write_all(&t.data)?;
    w.write_all(b"=")?;
    Ok(())
}

/// The attribute value without its quotes, or `None` when the attribute has no value.
pub(crate) fn attr_value(t: &Token) -> Option<&[u8]> {
    match t.attr_val.len() {
        0 | 1 => None,
        n => Some(&t.attr_val[1..n - 1]),
    }
}
