#![doc = include_str!("../README.md")]
//! Document tree for INI files with section inheritance.

mod builder;
mod diagnostic;
mod value;

pub use builder::{BuildError, TreeBuilder};
pub use diagnostic::Diagnostic;
pub use ini_parse::{Error, ErrorKind, Mark, Tag};
pub use value::{Document, Property, Section};

/// Why [`parse`] failed.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The tokenizer or parser rejected the input.
    Parse(Error),
    /// The events did not form a valid document.
    Build(BuildError),
}

impl TreeError {
    /// Render this error against `source` with ariadne.
    pub fn render(&self, filename: &str, source: &str) -> String {
        self.diagnostic().render(filename, source)
    }

    /// The error as a renderable diagnostic.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            TreeError::Parse(err) => Diagnostic::new(err.clone()),
            TreeError::Build(err) => Diagnostic::from(err),
        }
    }
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::Parse(err) => std::fmt::Display::fmt(err, f),
            TreeError::Build(err) => std::fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Parse(err) => Some(err),
            TreeError::Build(err) => Some(err),
        }
    }
}

impl From<Error> for TreeError {
    fn from(err: Error) -> Self {
        TreeError::Parse(err)
    }
}

impl From<BuildError> for TreeError {
    fn from(err: BuildError) -> Self {
        TreeError::Build(err)
    }
}

/// Parse an INI document into a tree.
pub fn parse(source: &str) -> Result<Document, TreeError> {
    let mut builder = TreeBuilder::new();
    ini_parse::Parser::new(source).parse(&mut builder)?;
    Ok(builder.finish()?)
}

impl Document {
    /// Parse an INI document.
    pub fn parse(source: &str) -> Result<Self, TreeError> {
        parse(source)
    }
}

#[cfg(test)]
mod tests;
