//! Diagnostic rendering for parser and build errors.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use ini_parse::{Error, ErrorKind, Mark};

use crate::BuildError;

/// An [`Error`] ready to be rendered against its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// The underlying error record.
    pub error: Error,
}

impl Diagnostic {
    /// Wrap an error.
    pub fn new(error: Error) -> Self {
        Self { error }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.error.to_string())
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename, source);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
        source: &str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, Range<usize>)> {
        let error = &self.error;
        let range = span(source, error.problem_mark);

        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(format!("{} error: {}", error.kind.as_str(), error.problem))
            .with_label(
                Label::new((filename, range))
                    .with_message(label_for(error))
                    .with_color(Color::Red),
            );

        if let (Some(context), Some(mark)) = (&error.context, error.context_mark) {
            report = report.with_label(
                Label::new((filename, span(source, mark)))
                    .with_message(context.clone())
                    .with_color(Color::Blue),
            );
        }

        if let Some(help) = help_for(&error.problem) {
            report = report.with_help(help);
        }
        report
    }
}

impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        Self::new(error)
    }
}

impl From<&BuildError> for Diagnostic {
    fn from(err: &BuildError) -> Self {
        let (problem, mark) = match err {
            BuildError::UnexpectedEvent { kind, mark } => {
                (format!("unexpected {:?} event", kind), *mark)
            }
            BuildError::UnknownParent {
                section,
                parent,
                mark,
            } => (
                format!(
                    "section `{}` inherits from undeclared section `{}`",
                    section, parent
                ),
                *mark,
            ),
            BuildError::InvalidUtf8 { mark } => ("invalid UTF-8".to_string(), *mark),
            BuildError::Incomplete => ("document ended unexpectedly".to_string(), Mark::default()),
        };
        Self::new(Error::new(ErrorKind::Composer, problem, mark))
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for Diagnostic {}

/// Byte range to underline for a mark. Marks are zero-width, so the
/// character at the mark is used, or the empty range at the end of input.
fn span(source: &str, mark: Mark) -> Range<usize> {
    let start = mark.index.min(source.len());
    match source.get(start..).and_then(|rest| rest.chars().next()) {
        Some(c) => start..start + c.len_utf8(),
        None => start..start,
    }
}

fn label_for(error: &Error) -> &'static str {
    match error.kind {
        ErrorKind::Scanner => "could not scan this",
        ErrorKind::Composer => "found here",
        _ => "unexpected token here",
    }
}

fn help_for(problem: &str) -> Option<&'static str> {
    let expected = problem.strip_prefix("did not find expected ")?;
    Some(match expected {
        "<scalar>" => "a section header needs a name, and `[child:parent]` needs both names",
        "<section-end>" => "close the section header with `]`",
        "<section-start> or <section-key>" => {
            "each line must be a `[section]` header or a `key = value` property"
        }
        "<section-key>" => "a stray `]` must be followed by a property",
        "<section-value>" => "separate the key from its value with `=`",
        "<document-start>" => "the token stream must begin with a document start",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use ini_parse::Parser;

    fn first_error(source: &str) -> Error {
        Parser::new(source)
            .parse_to_vec()
            .expect_err("source should not parse")
    }

    fn render_stripped(diagnostic: &Diagnostic, source: &str) -> String {
        let rendered = diagnostic.render("test.ini", source);
        String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap()
    }

    #[test]
    fn test_missing_section_end_diagnostic() {
        let source = "[server\nport = 80";
        let diagnostic = Diagnostic::new(first_error(source));
        let rendered = render_stripped(&diagnostic, source);

        assert!(rendered.contains("parser error: did not find expected <section-end>"));
        assert!(rendered.contains("test.ini"));
        assert!(rendered.contains("close the section header with `]`"));
    }

    #[test]
    fn test_scanner_context_is_labelled() {
        let source = "name = \"unterminated";
        let diagnostic = Diagnostic::new(first_error(source));
        let rendered = render_stripped(&diagnostic, source);

        assert!(rendered.contains("scanner error"));
        assert!(rendered.contains("while scanning a quoted scalar"));
    }

    #[test]
    fn test_mark_at_end_of_input() {
        assert_eq!(span("ab", Mark::new(2, 0, 2)), 2..2);
        assert_eq!(span("ab", Mark::new(9, 0, 9)), 2..2);
        assert_eq!(span("aé", Mark::new(1, 0, 1)), 1..3);
    }

    #[test]
    fn test_build_error_diagnostic() {
        let err = BuildError::UnknownParent {
            section: "web".to_string(),
            parent: "base".to_string(),
            mark: Mark::new(0, 0, 0),
        };
        let source = "[web:base]";
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(diagnostic.error.kind, ErrorKind::Composer);

        let rendered = render_stripped(&diagnostic, source);
        assert!(rendered.contains("inherits from undeclared section `base`"));
    }

    #[test]
    fn test_display_matches_error() {
        let err = Error::parser("did not find expected <scalar>", Mark::new(3, 0, 3));
        assert_eq!(Diagnostic::new(err.clone()).to_string(), err.to_string());
    }
}
