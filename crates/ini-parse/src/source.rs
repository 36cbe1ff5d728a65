//! One-token lookahead over a scanner.

use std::collections::VecDeque;

use crate::{Error, Mark, Scan, Token, TokenKind};

/// Pull queue in front of a scanner.
///
/// `peek` fetches on demand and keeps returning the same token until
/// `consume` removes it. Consumed tokens are never seen again.
#[derive(Clone)]
pub struct TokenSource<'src, S> {
    scanner: S,
    /// The fetched but unconsumed token. `Some` is the "available" flag.
    lookahead: Option<Token<'src>>,
    tokens_parsed: usize,
    document_end_produced: bool,
}

impl<'src, S: Scan<'src>> TokenSource<'src, S> {
    /// Wrap a scanner.
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            lookahead: None,
            tokens_parsed: 0,
            document_end_produced: false,
        }
    }

    /// The next unconsumed token.
    ///
    /// Fails only when the scanner fails. The scanner terminates every
    /// document with an explicit `DocumentEnd`, so running out of input is
    /// never an error here.
    pub fn peek(&mut self) -> Result<&Token<'src>, Error> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.scanner.scan()?,
        };
        Ok(self.lookahead.insert(token))
    }

    /// Remove the token returned by the preceding `peek`.
    pub fn consume(&mut self) {
        debug_assert!(self.lookahead.is_some(), "consume without peek");
        if let Some(token) = self.lookahead.take() {
            self.record(&token);
        }
    }

    /// Peek and consume in one step, handing the token over.
    pub fn next(&mut self) -> Result<Token<'src>, Error> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.scanner.scan()?,
        };
        self.record(&token);
        Ok(token)
    }

    fn record(&mut self, token: &Token<'src>) {
        self.tokens_parsed += 1;
        if token.kind == TokenKind::DocumentEnd {
            self.document_end_produced = true;
        }
    }

    /// Whether a fetched token is waiting to be consumed.
    pub fn token_available(&self) -> bool {
        self.lookahead.is_some()
    }

    /// Whether the `DocumentEnd` token has been consumed.
    pub fn document_end_produced(&self) -> bool {
        self.document_end_produced
    }

    /// Number of tokens consumed so far.
    pub fn tokens_parsed(&self) -> usize {
        self.tokens_parsed
    }
}

/// A scanner that replays a prepared list of tokens.
///
/// Once the list is exhausted it keeps answering with the error given to
/// [`TokenList::failing_with`], or with a scanner error at the last token's
/// end mark.
#[derive(Debug, Clone)]
pub struct TokenList<'src> {
    tokens: VecDeque<Token<'src>>,
    failure: Option<Error>,
    last_mark: Mark,
}

impl<'src> TokenList<'src> {
    /// Replay `tokens` in order.
    pub fn new(tokens: impl IntoIterator<Item = Token<'src>>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            failure: None,
            last_mark: Mark::default(),
        }
    }

    /// Fail with `error` once the tokens run out.
    pub fn failing_with(mut self, error: Error) -> Self {
        self.failure = Some(error);
        self
    }
}

impl<'src> Scan<'src> for TokenList<'src> {
    fn scan(&mut self) -> Result<Token<'src>, Error> {
        if let Some(token) = self.tokens.pop_front() {
            self.last_mark = token.end_mark;
            return Ok(token);
        }
        Err(self.failure.clone().unwrap_or_else(|| {
            Error::scanner("found unexpected end of token list", self.last_mark)
        }))
    }
}
