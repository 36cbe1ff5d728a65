//! Token types for the INI tokenizer.

use std::borrow::Cow;

use crate::Mark;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Stream framing, reserved for the tokenizer
    /// Start of the byte stream.
    StreamStart,
    /// End of the byte stream, repeated after `DocumentEnd`.
    StreamEnd,

    // Document framing
    /// Start of the document (zero width, always first).
    DocumentStart,
    /// End of the document (zero width, always last).
    DocumentEnd,

    // Section headers
    /// `[`
    SectionStart,
    /// `]`
    SectionEnd,
    /// `:` between a section name and its parent
    SectionInherit,

    // Properties
    /// Introduces a property key (zero width, precedes the key scalar)
    SectionKey,
    /// `=`
    SectionValue,

    /// Text payload: a section name, key, or value.
    Scalar,

    // Comments, reserved for the tokenizer
    /// `;` or `#`
    CommentStart,
    /// End of a comment line.
    CommentEnd,
}

/// How a scalar was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalarStyle {
    /// Let the consumer choose.
    #[default]
    Any,
    /// Unquoted text.
    Plain,
    /// Literal text.
    Literal,
    /// `'...'`
    SingleQuoted,
    /// `"..."`
    DoubleQuoted,
}

/// A token with its kind, source range, and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// Where the token starts.
    pub start_mark: Mark,
    /// Where the token ends (exclusive).
    pub end_mark: Mark,
    /// Payload bytes. Borrowed unless escape processing produced new text.
    pub value: Cow<'src, [u8]>,
    /// Scalar style (meaningful for `Scalar` and `SectionEnd`).
    pub style: ScalarStyle,
}

impl<'src> Token<'src> {
    /// Create a token without a payload.
    pub fn new(kind: TokenKind, start_mark: Mark, end_mark: Mark) -> Self {
        Self {
            kind,
            start_mark,
            end_mark,
            value: Cow::Borrowed(&[]),
            style: ScalarStyle::Any,
        }
    }

    /// Create a token with a payload and style.
    pub fn with_value(
        kind: TokenKind,
        start_mark: Mark,
        end_mark: Mark,
        value: impl Into<Cow<'src, [u8]>>,
        style: ScalarStyle,
    ) -> Self {
        Self {
            kind,
            start_mark,
            end_mark,
            value: value.into(),
            style,
        }
    }
}
