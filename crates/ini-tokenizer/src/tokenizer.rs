//! Tokenizer for inheriting INI documents.

use std::borrow::Cow;
use std::collections::VecDeque;

use crate::{Error, Mark, ScalarStyle, Token, TokenKind};
use tracing::trace;

/// A pull interface over a token producer.
///
/// Every successful call yields the next token in grammar order. The
/// sequence always ends with an explicit `DocumentEnd` token; an `Err`
/// means the producer failed and will not recover.
pub trait Scan<'src> {
    /// Produce the next token.
    fn scan(&mut self) -> Result<Token<'src>, Error>;
}

/// A tokenizer that produces tokens from INI source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Position of the first character of `remaining`.
    mark: Mark,

    /// Tokens scanned from the current line, not yet handed out.
    pending: VecDeque<Token<'src>>,
    document_start_produced: bool,
    document_end_produced: bool,
    /// Set once scanning fails; reported after `pending` drains.
    error: Option<Error>,
    /// Whether the iterator adapter is exhausted.
    finished: bool,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            mark: Mark::default(),
            pending: VecDeque::new(),
            document_start_produced: false,
            document_end_produced: false,
            error: None,
            finished: false,
        }
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        let len = c.len_utf8();
        self.mark.index += len;
        if c == '\n' {
            self.mark.line += 1;
            self.mark.column = 0;
        } else {
            self.mark.column += 1;
        }
        self.remaining = &self.remaining[len..];
        Some(c)
    }

    /// Source bytes between two byte offsets.
    #[inline]
    fn slice(&self, start: usize, end: usize) -> &'src [u8] {
        let source = self.source;
        &source.as_bytes()[start..end]
    }

    /// Queue a token for the parser.
    fn push(&mut self, token: Token<'src>) {
        trace!(
            "Token {:?} at {:?}: {:?}",
            token.kind,
            token.start_mark,
            String::from_utf8_lossy(&token.value)
        );
        self.pending.push_back(token);
    }

    /// Queue a single-character punctuation token.
    fn push_punct(&mut self, kind: TokenKind) {
        let start = self.mark;
        let Some(c) = self.advance() else {
            return;
        };
        let bytes = self.slice(start.index, start.index + c.len_utf8());
        self.push(Token::with_value(
            kind,
            start,
            self.mark,
            bytes,
            ScalarStyle::Any,
        ));
    }

    /// Skip spaces and tabs.
    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    /// Skip all whitespace, including line breaks.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Skip to (not past) the end of the current line.
    fn skip_to_eol(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    /// Only whitespace or a comment may follow a header or a quoted scalar.
    fn expect_line_end(&mut self, context: &str, context_mark: Mark) -> Result<(), Error> {
        self.skip_inline_whitespace();
        match self.peek() {
            None | Some('\n') => Ok(()),
            Some(';' | '#') => {
                self.skip_to_eol();
                Ok(())
            }
            Some(_) => Err(Error::scanner("found unexpected content", self.mark)
                .with_context(context.to_string(), context_mark)),
        }
    }

    /// Scan whatever starts at the next non-blank character, queueing the
    /// tokens of one construct.
    fn fetch_more(&mut self) -> Result<(), Error> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(';' | '#') => {
                self.skip_to_eol();
                Ok(())
            }
            Some('[') => self.fetch_section_header(),
            Some(']') => {
                self.push_punct(TokenKind::SectionEnd);
                Ok(())
            }
            Some('=') => self.fetch_value(),
            Some(_) => self.fetch_property(),
        }
    }

    /// `[name]` or `[name:parent]`.
    fn fetch_section_header(&mut self) -> Result<(), Error> {
        let header_mark = self.mark;
        self.push_punct(TokenKind::SectionStart);

        self.skip_inline_whitespace();
        self.fetch_header_name()?;

        self.skip_inline_whitespace();
        if self.peek() == Some(':') {
            // The joined `child:parent` value is split at the first marker.
            if let Some(name) = self.pending.back()
                && name.kind == TokenKind::Scalar
                && name.value.contains(&b':')
            {
                return Err(Error::scanner(
                    "found inheritance marker in an inheriting section name",
                    name.start_mark,
                )
                .with_context("while scanning a section header", header_mark));
            }
            self.push_punct(TokenKind::SectionInherit);
            self.skip_inline_whitespace();
            self.fetch_header_name()?;
            self.skip_inline_whitespace();
        }

        if self.peek() == Some(']') {
            self.push_punct(TokenKind::SectionEnd);
            self.expect_line_end("while scanning a section header", header_mark)?;
        }
        Ok(())
    }

    fn fetch_header_name(&mut self) -> Result<(), Error> {
        if matches!(self.peek(), Some('"' | '\'')) {
            let token = self.scan_quoted()?;
            self.push(token);
        } else if let Some(token) = self.scan_plain(|c, _| matches!(c, ':' | ']')) {
            self.push(token);
        }
        Ok(())
    }

    /// `key = value`, `key =`, or a key on its own.
    fn fetch_property(&mut self) -> Result<(), Error> {
        let key_mark = self.mark;
        self.push(Token::new(TokenKind::SectionKey, key_mark, key_mark));

        if matches!(self.peek(), Some('"' | '\'')) {
            let token = self.scan_quoted()?;
            self.push(token);
            self.skip_inline_whitespace();
        } else if let Some(token) = self.scan_plain(|c, _| c == '=') {
            self.push(token);
        }

        if self.peek() == Some('=') {
            self.fetch_value()?;
        }
        Ok(())
    }

    /// `= value`, starting at the `=`.
    fn fetch_value(&mut self) -> Result<(), Error> {
        self.push_punct(TokenKind::SectionValue);
        self.skip_inline_whitespace();

        match self.peek() {
            Some('"' | '\'') => {
                let quote_mark = self.mark;
                let token = self.scan_quoted()?;
                self.push(token);
                self.expect_line_end("while scanning a quoted scalar", quote_mark)
            }
            _ => {
                // Inline comments need whitespace before the marker.
                if let Some(token) =
                    self.scan_plain(|c, prev| matches!(c, ';' | '#') && prev.is_whitespace())
                {
                    self.push(token);
                }
                self.skip_to_eol();
                Ok(())
            }
        }
    }

    /// Scan unquoted text up to `stop` or the end of the line, trimming
    /// trailing whitespace. Returns `None` when nothing but blanks was found.
    ///
    /// `stop` receives the candidate character and the character before it.
    fn scan_plain(&mut self, stop: impl Fn(char, char) -> bool) -> Option<Token<'src>> {
        let start = self.mark;
        let mut end = start;
        let mut prev = ' ';
        while let Some(c) = self.peek() {
            if c == '\n' || stop(c, prev) {
                break;
            }
            self.advance();
            if !c.is_whitespace() {
                end = self.mark;
            }
            prev = c;
        }
        if end == start {
            return None;
        }
        Some(Token::with_value(
            TokenKind::Scalar,
            start,
            end,
            self.slice(start.index, end.index),
            ScalarStyle::Plain,
        ))
    }

    /// Scan a `"..."` or `'...'` scalar starting at the opening quote.
    fn scan_quoted(&mut self) -> Result<Token<'src>, Error> {
        const CONTEXT: &str = "while scanning a quoted scalar";

        let start = self.mark;
        let Some(quote) = self.advance() else {
            return Err(Error::scanner("found unexpected end of input", start));
        };
        let style = if quote == '"' {
            ScalarStyle::DoubleQuoted
        } else {
            ScalarStyle::SingleQuoted
        };
        let content_start = self.mark.index;
        // Only allocated once an escape forces the payload to differ from the source.
        let mut owned: Option<Vec<u8>> = None;

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(Error::scanner("found unterminated quoted scalar", self.mark)
                        .with_context(CONTEXT, start));
                }
                Some('\'') if quote == '\'' && self.peek_nth(1) == Some('\'') => {
                    let at = self.mark.index;
                    owned
                        .get_or_insert_with(|| self.slice(content_start, at).to_vec())
                        .push(b'\'');
                    self.advance();
                    self.advance();
                }
                Some(c) if c == quote => {
                    let content_end = self.mark.index;
                    self.advance();
                    let value = match owned {
                        Some(buf) => Cow::Owned(buf),
                        None => Cow::Borrowed(self.slice(content_start, content_end)),
                    };
                    return Ok(Token::with_value(
                        TokenKind::Scalar,
                        start,
                        self.mark,
                        value,
                        style,
                    ));
                }
                Some('\\') if quote == '"' => {
                    let escape_mark = self.mark;
                    let at = self.mark.index;
                    self.advance();
                    let decoded = match self.peek() {
                        Some('\\') => b'\\',
                        Some('"') => b'"',
                        Some('n') => b'\n',
                        Some('t') => b'\t',
                        Some('r') => b'\r',
                        Some('0') => b'\0',
                        _ => {
                            return Err(Error::scanner(
                                "found unknown escape character",
                                escape_mark,
                            )
                            .with_context(CONTEXT, start));
                        }
                    };
                    self.advance();
                    owned
                        .get_or_insert_with(|| self.slice(content_start, at).to_vec())
                        .push(decoded);
                }
                Some(c) => {
                    self.advance();
                    if let Some(buf) = owned.as_mut() {
                        let mut utf8 = [0u8; 4];
                        buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                    }
                }
            }
        }
    }
}

impl<'src> Scan<'src> for Tokenizer<'src> {
    fn scan(&mut self) -> Result<Token<'src>, Error> {
        if !self.document_start_produced {
            self.document_start_produced = true;
            let token = Token::new(TokenKind::DocumentStart, self.mark, self.mark);
            trace!("Token {:?} at {:?}", token.kind, token.start_mark);
            return Ok(token);
        }

        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            if let Some(err) = &self.error {
                return Err(err.clone());
            }
            if self.document_end_produced {
                return Ok(Token::new(TokenKind::StreamEnd, self.mark, self.mark));
            }
            if self.is_eof() {
                self.document_end_produced = true;
                let token = Token::new(TokenKind::DocumentEnd, self.mark, self.mark);
                trace!("Token {:?} at {:?}", token.kind, token.start_mark);
                return Ok(token);
            }
            if let Err(err) = self.fetch_more() {
                trace!(%err, "scan failed");
                self.error = Some(err);
            }
        }
    }
}

/// Yields tokens up to and including `DocumentEnd`, or up to the first error.
impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = Scan::scan(self);
        match &result {
            Ok(token) if token.kind == TokenKind::DocumentEnd => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(result)
    }
}
