//! Document types for INI files.
//!
//! A document is an ordered list of sections. Every property belongs to a
//! section; properties written before the first header live in the
//! implicit `default` section. A section may name a parent with
//! `[child:parent]`, and lookups through [`Document::get`] fall back along
//! that chain.

use ini_parse::{Mark, Tag};

/// A parsed INI document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Sections in order of first declaration.
    pub sections: Vec<Section>,
}

/// A section and its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Section name.
    pub name: String,
    /// Parent section name, from `[name:parent]`.
    pub parent: Option<String>,
    /// True for the synthesized `default` section.
    pub implicit: bool,
    /// Start of the header (or of the first key, for the default section).
    pub start_mark: Mark,
    /// End of the header.
    pub end_mark: Mark,
    /// Properties in source order.
    pub properties: Vec<Property>,
}

/// A `key = value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Key text.
    pub key: String,
    /// Value text; empty when the value was left out.
    pub value: String,
    /// Inferred type of the value.
    pub tag: Tag,
    /// Where the key starts.
    pub key_mark: Mark,
    /// Where the value starts (the `=`).
    pub value_mark: Mark,
}

impl Property {
    /// Value text, unless the value is null.
    pub fn as_str(&self) -> Option<&str> {
        match self.tag {
            Tag::Null => None,
            _ => Some(&self.value),
        }
    }

    /// Whether the value is null or absent.
    pub fn is_null(&self) -> bool {
        self.tag == Tag::Null
    }

    /// Value as a boolean, if it was classified as one.
    pub fn as_bool(&self) -> Option<bool> {
        if self.tag != Tag::Bool {
            return None;
        }
        match self.value.as_str() {
            "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => Some(true),
            _ => Some(false),
        }
    }

    /// Value as an integer, if it was classified as one and fits.
    pub fn as_i64(&self) -> Option<i64> {
        if self.tag != Tag::Int {
            return None;
        }
        let cleaned: String = self.value.chars().filter(|&c| c != '_').collect();
        let (sign, body) = match cleaned.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", cleaned.strip_prefix('+').unwrap_or(&cleaned)),
        };
        let (radix, digits) = match body.get(..2) {
            Some("0x" | "0X") => (16, &body[2..]),
            Some("0o" | "0O") => (8, &body[2..]),
            Some("0b" | "0B") => (2, &body[2..]),
            _ => (10, body),
        };
        // The sign stays attached so `i64::MIN` parses.
        i64::from_str_radix(&format!("{}{}", sign, digits), radix).ok()
    }

    /// Value as a float. Integers convert too.
    pub fn as_f64(&self) -> Option<f64> {
        match self.tag {
            Tag::Float => match self.value.as_str() {
                ".inf" | "+.inf" | ".Inf" | "+.Inf" => Some(f64::INFINITY),
                "-.inf" | "-.Inf" => Some(f64::NEG_INFINITY),
                ".nan" | ".NaN" => Some(f64::NAN),
                text => text.replace('_', "").parse().ok(),
            },
            Tag::Int => self.as_i64().map(|i| i as f64),
            _ => None,
        }
    }
}

impl Section {
    /// The last property with this key, as later assignments win.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.iter().rev().find(|p| p.key == key)
    }

    /// Whether the section has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Document {
    /// Look up a section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Look up `key` in `section`, then along its parent chain.
    ///
    /// An inheritance cycle ends the walk instead of looping.
    pub fn get(&self, section: &str, key: &str) -> Option<&Property> {
        let mut visited: Vec<&str> = Vec::new();
        let mut current = self.section(section)?;
        loop {
            if let Some(property) = current.get(key) {
                return Some(property);
            }
            visited.push(&current.name);
            let parent = current.parent.as_deref()?;
            if visited.contains(&parent) {
                return None;
            }
            current = self.section(parent)?;
        }
    }

    /// The chain of section names from `section` up to its root ancestor.
    pub fn ancestry(&self, section: &str) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut next = self.section(section);
        while let Some(current) = next {
            if chain.contains(&current.name.as_str()) {
                break;
            }
            chain.push(&current.name);
            next = current.parent.as_deref().and_then(|p| self.section(p));
        }
        chain
    }

    /// Iterate over sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Whether the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
