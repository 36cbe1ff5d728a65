//! Event types for the INI event-based parser.

use std::borrow::Cow;
use std::fmt;

use crate::{Mark, ScalarStyle};

/// Name of the section synthesized for keys that precede any header.
pub const DEFAULT_SECTION: &str = "default";

/// The kind of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// Empty event, returned once the parser has nothing more to say.
    #[default]
    NoEvent,
    /// Start of document.
    DocumentStart,
    /// End of document.
    DocumentEnd,
    /// A section header, the synthesized default section, or the
    /// zero-width boundary that closes a section's properties.
    SectionEntry,
    /// A property key or value. Which one is decided by the consumer's
    /// own state: keys and values strictly alternate within a section.
    Scalar,
}

/// Semantic label attached to section and scalar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A plain section header.
    Section,
    /// A header with an inheritance clause; the value is `child:parent`.
    SectionInherit,
    /// Absent or null value.
    Null,
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Anything else.
    Str,
}

impl Tag {
    /// Stable textual label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Section => "!!section",
            Tag::SectionInherit => "!!inherit",
            Tag::Null => "!!null",
            Tag::Bool => "!!bool",
            Tag::Int => "!!int",
            Tag::Float => "!!float",
            Tag::Str => "!!str",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event emitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event<'src> {
    /// The kind of event.
    pub kind: EventKind,
    /// Where the event starts.
    pub start_mark: Mark,
    /// Where the event ends.
    pub end_mark: Mark,
    /// Payload: section name, key, or value.
    pub value: Cow<'src, [u8]>,
    /// Semantic label, if any.
    pub tag: Option<Tag>,
    /// Style of the originating scalar.
    pub style: ScalarStyle,
    /// True only for the synthesized default section.
    pub implicit: bool,
}

impl<'src> Event<'src> {
    /// The sentinel returned after the document ended or an error was seen.
    pub fn none() -> Self {
        Self::default()
    }

    /// An event with no payload.
    pub fn new(kind: EventKind, start_mark: Mark, end_mark: Mark) -> Self {
        Self {
            kind,
            start_mark,
            end_mark,
            ..Self::default()
        }
    }

    /// Whether this is the `NoEvent` sentinel.
    pub fn is_none(&self) -> bool {
        self.kind == EventKind::NoEvent
    }

    /// Whether this is the zero-width boundary closing a section's
    /// properties (a section entry with neither payload nor tag).
    pub fn is_section_boundary(&self) -> bool {
        self.kind == EventKind::SectionEntry && self.tag.is_none()
    }

    /// Payload as text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// Split a `child:parent` section value into its two names.
    ///
    /// Returns `None` unless this is an inheriting section entry.
    pub fn inherit_names(&self) -> Option<(&[u8], &[u8])> {
        if self.kind != EventKind::SectionEntry || self.tag != Some(Tag::SectionInherit) {
            return None;
        }
        let at = self.value.iter().position(|&b| b == b':')?;
        Some((&self.value[..at], &self.value[at + 1..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_sentinel() {
        let event = Event::none();
        assert!(event.is_none());
        assert!(event.value.is_empty());
        assert_eq!(event.tag, None);
    }

    #[test]
    fn test_inherit_names() {
        let event = Event {
            kind: EventKind::SectionEntry,
            value: Cow::Borrowed(b"child:parent"),
            tag: Some(Tag::SectionInherit),
            ..Event::default()
        };
        assert_eq!(
            event.inherit_names(),
            Some((&b"child"[..], &b"parent"[..]))
        );

        let plain = Event {
            tag: Some(Tag::Section),
            ..event
        };
        assert_eq!(plain.inherit_names(), None);
    }
}
