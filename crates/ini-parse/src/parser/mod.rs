//! Pull-based event parser for INI documents.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::{
    DEFAULT_SECTION, Error, Event, EventKind, Mark, ParseCallback, ScalarStyle, Scan, Tag, Token,
    TokenKind, TokenSource, Tokenizer, classify,
};


const EXPECTED_DOCUMENT_START: &str = "did not find expected <document-start>";
const EXPECTED_SCALAR: &str = "did not find expected <scalar>";
const EXPECTED_SECTION_END: &str = "did not find expected <section-end>";
const EXPECTED_SECTION_START_OR_KEY: &str =
    "did not find expected <section-start> or <section-key>";
const EXPECTED_SECTION_KEY: &str = "did not find expected <section-key>";
const EXPECTED_SECTION_VALUE: &str = "did not find expected <section-value>";

/// Parser state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    /// Expect DOCUMENT-START.
    DocumentStart,
    /// Document ended. Terminal.
    DocumentEnd,
    /// Expect the first section entry; a bare key opens the default section.
    SectionFirstEntry,
    /// Expect a section entry.
    SectionEntry,
    /// Expect the first key of a section.
    SectionFirstKey,
    /// Expect a key, or the end of the section's properties.
    SectionKey,
    /// Expect `=` and a value.
    SectionValue,
}

/// Whether the driver still delegates to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Running,
    Done,
    Errored,
}

/// Pull-based event parser.
///
/// Each call to [`Parser::parse_next_event`] does exactly the work needed
/// for one event. Once the document ends or an error is reported, every
/// later call returns [`Event::none`] successfully; the first error stays
/// available through [`Parser::error`].
#[derive(Clone)]
pub struct Parser<'src, S = Tokenizer<'src>> {
    source: TokenSource<'src, S>,
    state: ParserState,
    /// Return points. Holds at most `DocumentEnd` in this grammar.
    states: Vec<ParserState>,
    status: Status,
    error: Option<Error>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self::from_scanner(Tokenizer::new(source))
    }
}

impl<'src, S: Scan<'src>> Parser<'src, S> {
    /// Create a parser pulling tokens from an arbitrary scanner.
    pub fn from_scanner(scanner: S) -> Self {
        Self {
            source: TokenSource::new(scanner),
            state: ParserState::DocumentStart,
            states: Vec::with_capacity(1),
            status: Status::Running,
            error: None,
        }
    }

    /// Get the next event.
    ///
    /// Returns `Err` exactly once, on the call that detects the problem.
    pub fn parse_next_event(&mut self) -> Result<Event<'src>, Error> {
        // No events after the end of the document or an error.
        if self.status != Status::Running
            || self.source.document_end_produced()
            || self.state == ParserState::DocumentEnd
        {
            return Ok(Event::none());
        }

        match self.state_machine() {
            Ok(event) => {
                trace!(
                    kind = ?event.kind,
                    value = %String::from_utf8_lossy(&event.value),
                    tag = ?event.tag,
                    next = ?self.state,
                    "event"
                );
                if event.kind == EventKind::DocumentEnd {
                    self.status = Status::Done;
                }
                Ok(event)
            }
            Err(err) => {
                debug!(%err, state = ?self.state, "parse failed");
                self.status = Status::Errored;
                if self.error.is_none() {
                    self.error = Some(err.clone());
                }
                Err(err)
            }
        }
    }

    /// Parse all events into a vector, stopping at the first error.
    pub fn parse_to_vec(mut self) -> Result<Vec<Event<'src>>, Error> {
        let mut events = Vec::new();
        loop {
            let event = self.parse_next_event()?;
            if event.is_none() {
                return Ok(events);
            }
            events.push(event);
        }
    }

    /// Push every event to `callback` until the document ends, the first
    /// error, or the callback asks to stop.
    pub fn parse<C: ParseCallback<'src>>(mut self, callback: &mut C) -> Result<(), Error> {
        loop {
            let event = self.parse_next_event()?;
            if event.is_none() || !callback.event(event) {
                return Ok(());
            }
        }
    }

    /// The error that stopped the parser, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// The current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Number of return points on the state stack.
    pub fn state_depth(&self) -> usize {
        self.states.len()
    }

    /// Number of tokens consumed so far.
    pub fn tokens_parsed(&self) -> usize {
        self.source.tokens_parsed()
    }

    /// Whether further calls can only return [`Event::none`].
    pub fn is_done(&self) -> bool {
        self.status != Status::Running
            || self.source.document_end_produced()
            || self.state == ParserState::DocumentEnd
    }

    fn state_machine(&mut self) -> Result<Event<'src>, Error> {
        match self.state {
            ParserState::DocumentStart => self.parse_document_start(),
            ParserState::SectionFirstEntry => self.parse_section_entry(true),
            ParserState::SectionEntry => self.parse_section_entry(false),
            ParserState::SectionFirstKey | ParserState::SectionKey => self.parse_section_key(),
            ParserState::SectionValue => self.parse_section_value(),
            ParserState::DocumentEnd => Ok(Event::none()),
        }
    }

    /// Kind and start mark of the lookahead token.
    fn peek(&mut self) -> Result<(TokenKind, Mark), Error> {
        let token = self.source.peek()?;
        Ok((token.kind, token.start_mark))
    }

    /// Consume the lookahead if it has the given kind; otherwise fail with
    /// `problem` at its start, leaving it in place.
    fn expect(&mut self, kind: TokenKind, problem: &'static str) -> Result<Token<'src>, Error> {
        let (found, mark) = self.peek()?;
        if found != kind {
            return Err(Error::parser(problem, mark));
        }
        self.source.next()
    }

    fn pop_state(&mut self) -> ParserState {
        self.states.pop().unwrap_or(ParserState::DocumentEnd)
    }

    // document ::= DOCUMENT-START section* DOCUMENT-END
    fn parse_document_start(&mut self) -> Result<Event<'src>, Error> {
        let token = self.source.next()?;
        if token.kind != TokenKind::DocumentStart {
            return Err(Error::parser(EXPECTED_DOCUMENT_START, token.start_mark));
        }
        self.states.push(ParserState::DocumentEnd);
        self.state = ParserState::SectionFirstEntry;
        Ok(Event::new(
            EventKind::DocumentStart,
            token.start_mark,
            token.end_mark,
        ))
    }

    fn parse_section_entry(&mut self, first: bool) -> Result<Event<'src>, Error> {
        let (kind, mark) = self.peek()?;
        match kind {
            TokenKind::DocumentEnd => {
                let token = self.source.next()?;
                self.state = self.pop_state();
                Ok(Event::new(
                    EventKind::DocumentEnd,
                    token.start_mark,
                    token.end_mark,
                ))
            }
            // Keys before any header: open the default section without
            // consuming, so the key state sees the same token.
            TokenKind::SectionKey if first => {
                self.state = ParserState::SectionFirstKey;
                Ok(Event {
                    kind: EventKind::SectionEntry,
                    start_mark: mark,
                    end_mark: mark,
                    value: Cow::Borrowed(DEFAULT_SECTION.as_bytes()),
                    tag: Some(Tag::Section),
                    style: ScalarStyle::Any,
                    implicit: true,
                })
            }
            TokenKind::SectionStart => self.parse_section_header(),
            TokenKind::SectionEnd if !first => self.parse_detached_key(),
            _ => Err(Error::parser(EXPECTED_SECTION_START_OR_KEY, mark)),
        }
    }

    // SECTION-START SCALAR (SECTION-INHERIT SCALAR)? SECTION-END
    fn parse_section_header(&mut self) -> Result<Event<'src>, Error> {
        let open = self.source.next()?;
        let name = self.expect(TokenKind::Scalar, EXPECTED_SCALAR)?;

        let mut value = name.value;
        let mut tag = Tag::Section;
        let mut parent_end = None;

        if self.peek()?.0 == TokenKind::SectionInherit {
            let marker = self.source.next()?;
            let parent = self.expect(TokenKind::Scalar, EXPECTED_SCALAR)?;
            // child + marker + parent, split again by the consumer.
            let mut joined = value.into_owned();
            joined.extend_from_slice(&marker.value);
            joined.extend_from_slice(&parent.value);
            value = Cow::Owned(joined);
            tag = Tag::SectionInherit;
            parent_end = Some(parent.end_mark);
        }

        let close = self.expect(TokenKind::SectionEnd, EXPECTED_SECTION_END)?;
        self.state = ParserState::SectionFirstKey;
        Ok(Event {
            kind: EventKind::SectionEntry,
            start_mark: open.start_mark,
            end_mark: parent_end.unwrap_or(close.end_mark),
            value,
            tag: Some(tag),
            style: close.style,
            implicit: false,
        })
    }

    // A `]` where a section entry was expected, directly followed by a key.
    fn parse_detached_key(&mut self) -> Result<Event<'src>, Error> {
        self.source.consume();
        let key = self.expect(TokenKind::SectionKey, EXPECTED_SECTION_KEY)?;
        let scalar = self.expect(TokenKind::Scalar, EXPECTED_SCALAR)?;
        self.state = ParserState::SectionValue;
        Ok(scalar_event(key.start_mark, scalar))
    }

    // property ::= SECTION-KEY SCALAR SECTION-VALUE SCALAR?
    fn parse_section_key(&mut self) -> Result<Event<'src>, Error> {
        let (kind, mark) = self.peek()?;
        if kind != TokenKind::SectionKey {
            // End of this section's properties. The lookahead stays in place
            // for the entry state to look at on the next call.
            self.state = ParserState::SectionEntry;
            return Ok(Event::new(EventKind::SectionEntry, mark, mark));
        }

        let key = self.source.next()?;
        let scalar = self.expect(TokenKind::Scalar, EXPECTED_SCALAR)?;
        self.state = ParserState::SectionValue;
        Ok(scalar_event(key.start_mark, scalar))
    }

    fn parse_section_value(&mut self) -> Result<Event<'src>, Error> {
        let marker = self.expect(TokenKind::SectionValue, EXPECTED_SECTION_VALUE)?;

        let (kind, mark) = self.peek()?;
        self.state = ParserState::SectionKey;
        if kind == TokenKind::Scalar {
            let scalar = self.source.next()?;
            return Ok(scalar_event(marker.start_mark, scalar));
        }
        Ok(empty_scalar(mark))
    }
}

/// Yields events until the document ends or the first error.
impl<'src, S: Scan<'src>> Iterator for Parser<'src, S> {
    type Item = Result<Event<'src>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.parse_next_event() {
            Ok(event) if event.is_none() => None,
            result => Some(result),
        }
    }
}

/// A classified key or value spanning from `start` to the end of `scalar`.
fn scalar_event<'src>(start: Mark, scalar: Token<'src>) -> Event<'src> {
    let tag = classify(&scalar.value);
    Event {
        kind: EventKind::Scalar,
        start_mark: start,
        end_mark: scalar.end_mark,
        value: scalar.value,
        tag: Some(tag),
        style: scalar.style,
        implicit: false,
    }
}

/// A zero-width null value.
fn empty_scalar<'src>(mark: Mark) -> Event<'src> {
    Event {
        kind: EventKind::Scalar,
        start_mark: mark,
        end_mark: mark,
        value: Cow::Borrowed(&[]),
        tag: Some(Tag::Null),
        style: ScalarStyle::Plain,
        implicit: false,
    }
}
