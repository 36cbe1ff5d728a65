//! Tree builder from parse events.

use ini_parse::{Event, EventKind, Mark, ParseCallback, Tag};
use tracing::{debug, trace};

use crate::value::{Document, Property, Section};

/// Error during tree building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// An event arrived where the document structure does not allow it.
    UnexpectedEvent {
        /// What arrived.
        kind: EventKind,
        /// Where it starts.
        mark: Mark,
    },
    /// A section inherits from a section that was not declared before it.
    UnknownParent {
        /// The inheriting section.
        section: String,
        /// The missing parent.
        parent: String,
        /// Start of the inheriting header.
        mark: Mark,
    },
    /// A name, key, or value is not valid UTF-8.
    InvalidUtf8 {
        /// Start of the offending event.
        mark: Mark,
    },
    /// Events stopped before the end of the document.
    Incomplete,
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnexpectedEvent { kind, mark } => {
                write!(f, "unexpected {:?} event at {}", kind, mark)
            }
            BuildError::UnknownParent {
                section,
                parent,
                mark,
            } => write!(
                f,
                "section `{}` inherits from undeclared section `{}` at {}",
                section, parent, mark
            ),
            BuildError::InvalidUtf8 { mark } => write!(f, "invalid UTF-8 at {}", mark),
            BuildError::Incomplete => write!(f, "document ended unexpectedly"),
        }
    }
}

impl std::error::Error for BuildError {}

/// What the builder expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    DocumentStart,
    /// A section header, or the end of the document.
    Entry,
    /// A key, or the boundary that closes the section.
    Key,
    Value,
    Done,
}

/// Builder that constructs a [`Document`] from parse events.
///
/// Keys and values are both plain scalar events; the builder tells them
/// apart by alternating between the two.
pub struct TreeBuilder {
    sections: Vec<Section>,
    /// Index into `sections` receiving properties.
    current: usize,
    pending_key: Option<(String, Mark)>,
    expect: Expect,
    error: Option<BuildError>,
}

impl TreeBuilder {
    /// Create a new tree builder.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            current: 0,
            pending_key: None,
            expect: Expect::DocumentStart,
            error: None,
        }
    }

    /// Finish building and return the document.
    pub fn finish(self) -> Result<Document, BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.expect != Expect::Done {
            return Err(BuildError::Incomplete);
        }
        Ok(Document {
            sections: self.sections,
        })
    }

    fn fail(&mut self, err: BuildError) -> bool {
        debug!(%err, "build failed");
        self.error = Some(err);
        false
    }

    fn open_section(&mut self, event: &Event<'_>) -> Result<(), BuildError> {
        let (name, parent) = match event.inherit_names() {
            Some((child, parent)) => (text(child, event)?, Some(text(parent, event)?)),
            None => (text(&event.value, event)?, None),
        };

        if let Some(parent) = &parent
            && self.sections.iter().all(|s| &s.name != parent)
        {
            return Err(BuildError::UnknownParent {
                section: name,
                parent: parent.clone(),
                mark: event.start_mark,
            });
        }

        // A repeated header continues the earlier section.
        if let Some(index) = self.sections.iter().position(|s| s.name == name) {
            trace!(name = %name, "reopening section");
            let section = &mut self.sections[index];
            if section.parent.is_none() {
                section.parent = parent;
            }
            self.current = index;
            return Ok(());
        }

        trace!(name = %name, ?parent, "opening section");
        self.sections.push(Section {
            name,
            parent,
            implicit: event.implicit,
            start_mark: event.start_mark,
            end_mark: event.end_mark,
            properties: Vec::new(),
        });
        self.current = self.sections.len() - 1;
        Ok(())
    }

    fn push_property(&mut self, event: &Event<'_>) -> Result<(), BuildError> {
        let Some((key, key_mark)) = self.pending_key.take() else {
            return Err(BuildError::UnexpectedEvent {
                kind: event.kind,
                mark: event.start_mark,
            });
        };
        let value = text(&event.value, event)?;
        let Some(section) = self.sections.get_mut(self.current) else {
            return Err(BuildError::UnexpectedEvent {
                kind: event.kind,
                mark: event.start_mark,
            });
        };
        section.properties.push(Property {
            key,
            value,
            tag: event.tag.unwrap_or(Tag::Str),
            key_mark,
            value_mark: event.start_mark,
        });
        Ok(())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn text(bytes: &[u8], event: &Event<'_>) -> Result<String, BuildError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| BuildError::InvalidUtf8 {
        mark: event.start_mark,
    })
}

impl<'src> ParseCallback<'src> for TreeBuilder {
    fn event(&mut self, event: Event<'src>) -> bool {
        let result = match (self.expect, event.kind) {
            (_, EventKind::NoEvent) => Ok(()),
            (Expect::DocumentStart, EventKind::DocumentStart) => {
                self.expect = Expect::Entry;
                Ok(())
            }
            (Expect::Entry, EventKind::DocumentEnd) => {
                self.expect = Expect::Done;
                Ok(())
            }
            (Expect::Entry, EventKind::SectionEntry) if !event.is_section_boundary() => {
                self.expect = Expect::Key;
                self.open_section(&event)
            }
            (Expect::Key, EventKind::SectionEntry) if event.is_section_boundary() => {
                self.expect = Expect::Entry;
                Ok(())
            }
            // Also a key after a stray `]`, which stays in the current section.
            (Expect::Entry | Expect::Key, EventKind::Scalar) if !self.sections.is_empty() => {
                self.expect = Expect::Value;
                text(&event.value, &event).map(|key| {
                    self.pending_key = Some((key, event.start_mark));
                })
            }
            (Expect::Value, EventKind::Scalar) => {
                self.expect = Expect::Key;
                self.push_property(&event)
            }
            (_, kind) => Err(BuildError::UnexpectedEvent {
                kind,
                mark: event.start_mark,
            }),
        };

        match result {
            Ok(()) => true,
            Err(err) => self.fail(err),
        }
    }
}
