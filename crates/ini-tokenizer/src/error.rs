//! The error record shared by the tokenizer, parser, and document builder.

use std::fmt;

use crate::Mark;

/// Which stage of processing raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Cannot allocate memory.
    Memory,
    /// Cannot read or decode the input.
    Reader,
    /// Cannot scan the input into tokens.
    Scanner,
    /// Cannot parse the token stream.
    Parser,
    /// Cannot compose a document from events.
    Composer,
    /// Cannot write output.
    Writer,
    /// Cannot emit events.
    Emitter,
}

impl ErrorKind {
    /// Lowercase name used in rendered messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Memory => "memory",
            ErrorKind::Reader => "reader",
            ErrorKind::Scanner => "scanner",
            ErrorKind::Parser => "parser",
            ErrorKind::Composer => "composer",
            ErrorKind::Writer => "writer",
            ErrorKind::Emitter => "emitter",
        }
    }
}

/// A diagnostic anchored to a source position.
///
/// `problem` describes what went wrong at `problem_mark`. The optional
/// context names the construct being processed when it happened, e.g.
/// `"while scanning a quoted scalar"` together with the opening quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The stage that raised the error.
    pub kind: ErrorKind,
    /// Human-readable problem description.
    pub problem: String,
    /// Where the problem was found.
    pub problem_mark: Mark,
    /// What was being processed.
    pub context: Option<String>,
    /// Where the context began.
    pub context_mark: Option<Mark>,
}

impl Error {
    /// Create an error without context.
    pub fn new(kind: ErrorKind, problem: impl Into<String>, problem_mark: Mark) -> Self {
        Self {
            kind,
            problem: problem.into(),
            problem_mark,
            context: None,
            context_mark: None,
        }
    }

    /// Create a parser error.
    pub fn parser(problem: impl Into<String>, problem_mark: Mark) -> Self {
        Self::new(ErrorKind::Parser, problem, problem_mark)
    }

    /// Create a scanner error.
    pub fn scanner(problem: impl Into<String>, problem_mark: Mark) -> Self {
        Self::new(ErrorKind::Scanner, problem, problem_mark)
    }

    /// Attach a context message and mark.
    pub fn with_context(mut self, context: impl Into<String>, context_mark: Mark) -> Self {
        self.context = Some(context.into());
        self.context_mark = Some(context_mark);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.problem, self.problem_mark)?;
        if let Some(context) = &self.context {
            match self.context_mark {
                Some(mark) => write!(f, ", {} at {}", context, mark)?,
                None => write!(f, ", {}", context)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_display_without_context() {
        let err = Error::parser("did not find expected <scalar>", Mark::new(4, 0, 4));
        assert_eq!(err.to_string(), "did not find expected <scalar> at line 1, column 5");
    }

    #[test]
    fn test_display_with_context() {
        let err = Error::scanner("found unterminated quoted scalar", Mark::new(12, 1, 8))
            .with_context("while scanning a quoted scalar", Mark::new(6, 1, 2));
        assert_eq!(err.kind, ErrorKind::Scanner);
        assert_eq!(
            err.to_string(),
            "found unterminated quoted scalar at line 2, column 9, \
             while scanning a quoted scalar at line 2, column 3"
        );
    }
}
