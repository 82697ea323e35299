//! Lookahead queue over a [`TokenSource`].

use std::collections::VecDeque;

use crate::error::MarkminError;
use crate::token::{Token, TokenSource};

/// Wraps a token source, caching tokens that were peeked but not yet shifted.
///
/// The end of the stream and tokenizer failures both surface as a terminal
/// [`TokenKind::Error`](crate::TokenKind::Error) token which repeats forever;
/// [`TokenBuffer::finish`] tells the two apart.
pub struct TokenBuffer<S> {
    source: S,
    queue: VecDeque<Token>,
    terminal: Token,
    done: bool,
    failure: Option<MarkminError>,
}

impl<S: TokenSource> TokenBuffer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            queue: VecDeque::with_capacity(8),
            terminal: Token::error(),
            done: false,
            failure: None,
        }
    }

    fn pull(&mut self) -> Token {
        if self.done {
            return self.terminal.clone();
        }
        match self.source.next_token() {
            Ok(Some(token)) => {
                log::trace!(target: "markmin::tokens", "pull {:?}", token.kind);
                token
            }
            Ok(None) => {
                self.done = true;
                self.terminal.clone()
            }
            Err(e) => {
                log::trace!(target: "markmin::tokens", "tokenizer failed: {e}");
                self.done = true;
                self.failure = Some(e);
                self.terminal.clone()
            }
        }
    }

    /// Consume and return the next token.
    pub fn shift(&mut self) -> Token {
        match self.queue.pop_front() {
            Some(token) => token,
            None => self.pull(),
        }
    }

    /// The token `n` positions ahead of the next [`shift`](Self::shift), without consuming it.
    pub fn peek(&mut self, n: usize) -> &Token {
        while self.queue.len() <= n && !self.done {
            let token = self.pull();
            self.queue.push_back(token);
        }
        self.queue.get(n).unwrap_or(&self.terminal)
    }

    /// Resolve the terminal token: `Ok` at end of stream, the tokenizer's error otherwise.
    pub fn finish(&mut self) -> Result<(), MarkminError> {
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
