//! Whitespace collapsing for text content.

use crate::buffer::TokenBuffer;
use crate::error::MarkminError;
use crate::token::{TokenKind, TokenSource};

pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

pub fn is_all_whitespace(b: &[u8]) -> bool {
    b.iter().all(|&c| is_whitespace(c))
}

/// Replace every run of whitespace in `b` with a single space.
pub fn collapse_runs(b: &mut Vec<u8>) {
    let mut j = 0;
    let mut in_run = false;
    for i in 0..b.len() {
        let c = b[i];
        if is_whitespace(c) {
            if in_run {
                continue;
            }
            in_run = true;
            b[j] = b' ';
        } else {
            in_run = false;
            b[j] = c;
        }
        j += 1;
    }
    b.truncate(j);
}

/// What follows a text token that ends in a space.
enum TrailingSpace {
    /// Non-whitespace text: the space separates words.
    Significant,
    /// A tag or the end of the stream.
    AtBoundary,
    /// Text that starts with whitespace and will carry the separator itself.
    SpaceFollows,
}

/// Collapses text tokens so that at most one space separates two
/// non-whitespace stretches and none touches a tag.
///
/// Carries whether the last emitted byte was a space across tokens.
pub struct Collapser {
    preceded_by_space: bool,
    max_lookahead: usize,
}

impl Collapser {
    pub fn new(max_lookahead: usize) -> Self {
        Self {
            preceded_by_space: true,
            max_lookahead,
        }
    }

    /// Collapse `text` in place and return the part to emit.
    pub fn collapse<'t, S: TokenSource>(
        &mut self,
        tb: &mut TokenBuffer<S>,
        text: &'t mut Vec<u8>,
    ) -> Result<&'t [u8], MarkminError> {
        collapse_runs(text);
        let mut text: &[u8] = text;
        if text.is_empty() {
            return Ok(text);
        }

        if text[0] == b' ' && self.preceded_by_space {
            text = &text[1..];
        }

        self.preceded_by_space = false;
        if text.is_empty() {
            self.preceded_by_space = true;
        } else if text.ends_with(b" ") {
            self.preceded_by_space = true;
            match self.trailing_space(tb)? {
                TrailingSpace::Significant => {}
                TrailingSpace::AtBoundary => {
                    text = &text[..text.len() - 1];
                    // Nothing was written since the last tag when the token was a lone space.
                    self.preceded_by_space = text.is_empty();
                }
                TrailingSpace::SpaceFollows => {
                    text = &text[..text.len() - 1];
                    self.preceded_by_space = false;
                }
            }
        }
        Ok(text)
    }

    /// Record that bytes this collapser did not see were written.
    pub fn wrote_verbatim(&mut self) {
        self.preceded_by_space = false;
    }

    /// Walk ahead to the first token that decides whether a trailing space matters.
    fn trailing_space<S: TokenSource>(
        &self,
        tb: &mut TokenBuffer<S>,
    ) -> Result<TrailingSpace, MarkminError> {
        for i in 0..self.max_lookahead {
            let next = tb.peek(i);
            match next.kind {
                TokenKind::StartTag | TokenKind::EndTag | TokenKind::Error => {
                    return Ok(TrailingSpace::AtBoundary);
                }
                TokenKind::Text if next.data.first().is_some_and(|&c| is_whitespace(c)) => {
                    return Ok(TrailingSpace::SpaceFollows);
                }
                TokenKind::Text => return Ok(TrailingSpace::Significant),
                _ => {}
            }
        }
        Err(MarkminError::LookaheadExceeded(self.max_lookahead))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn collapsed(s: &str) -> String {
        let mut b = s.as_bytes().to_vec();
        collapse_runs(&mut b);
        String::from_utf8(b).unwrap()
    }

    fn run(texts: &[&str], after: Vec<Token>, max_lookahead: usize) -> Result<Vec<String>, MarkminError> {
        let mut tb = TokenBuffer::new(after.into_iter());
        let mut collapser = Collapser::new(max_lookahead);
        texts
            .iter()
            .map(|t| {
                let mut data = t.as_bytes().to_vec();
                let out = collapser.collapse(&mut tb, &mut data)?;
                Ok(String::from_utf8(out.to_vec()).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_collapse_runs() {
        assert_eq!(collapsed("Hello   \n   World"), "Hello World");
        assert_eq!(collapsed("\t\ta\r\n"), " a ");
        assert_eq!(collapsed(""), "");
        assert_eq!(collapsed("ab"), "ab");
    }

    #[test]
    fn test_leading_space_trimmed_at_start() {
        let out = run(&["  a"], vec![], 8).unwrap();
        assert_eq!(out, vec!["a"]);
    }

    #[test]
    fn test_trailing_space_before_tag_trimmed() {
        let out = run(&["a  "], vec![Token::new(TokenKind::StartTag, "b")], 8).unwrap();
        assert_eq!(out, vec!["a"]);
    }

    #[test]
    fn test_trailing_space_before_text_without_space_kept() {
        let after = vec![
            Token::new(TokenKind::Comment, "c"),
            Token::new(TokenKind::Text, "b"),
        ];
        let out = run(&["a "], after, 8).unwrap();
        assert_eq!(out, vec!["a "]);
    }

    #[test]
    fn test_trailing_space_before_text_with_space_trimmed() {
        let after = vec![
            Token::new(TokenKind::Comment, "c"),
            Token::new(TokenKind::Text, " b"),
        ];
        let out = run(&["a "], after, 8).unwrap();
        assert_eq!(out, vec!["a"]);
    }

    #[test]
    fn test_space_carried_across_tokens() {
        // The first token keeps its space, so the second drops its leading one.
        let after = vec![Token::new(TokenKind::Comment, "c"), Token::new(TokenKind::Text, "b")];
        let out = run(&["a ", " \n b"], after, 8).unwrap();
        assert_eq!(out, vec!["a ", "b"]);
    }

    #[test]
    fn test_lone_space_between_tags_not_carried_into_next_text() {
        let after = vec![
            Token::new(TokenKind::StartTag, "b"),
            Token::new(TokenKind::Text, " y"),
        ];
        let mut tb = TokenBuffer::new(after.into_iter());
        let mut collapser = Collapser::new(8);
        let mut emitted = Vec::new();
        for text in ["x", " "] {
            let mut data = text.as_bytes().to_vec();
            emitted.extend_from_slice(collapser.collapse(&mut tb, &mut data).unwrap());
        }
        assert!(tb.shift().is(TokenKind::StartTag));
        let mut data = tb.shift().data;
        emitted.extend_from_slice(collapser.collapse(&mut tb, &mut data).unwrap());
        assert_eq!(emitted, b"xy");
    }

    #[test]
    fn test_lone_space_before_spaced_text_keeps_separator() {
        let after = vec![
            Token::new(TokenKind::Comment, "c"),
            Token::new(TokenKind::Text, " y"),
        ];
        let out = run(&["x", " ", " y"], after, 8).unwrap();
        assert_eq!(out.concat(), "x y");
    }

    #[test]
    fn test_verbatim_output_keeps_next_leading_space() {
        let mut tb = TokenBuffer::new(Vec::<Token>::new().into_iter());
        let mut collapser = Collapser::new(8);
        collapser.wrote_verbatim();
        let mut data = b" y".to_vec();
        assert_eq!(collapser.collapse(&mut tb, &mut data).unwrap(), b" y");
    }

    #[test]
    fn test_lookahead_bound() {
        let after = (0..10).map(|_| Token::new(TokenKind::Comment, "c")).collect();
        let err = run(&["a "], after, 4).unwrap_err();
        assert!(matches!(err, MarkminError::LookaheadExceeded(4)));
    }
}
