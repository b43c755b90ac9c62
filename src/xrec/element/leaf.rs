//! Leaf element: terminal scalar value

use super::attributes::{escape_text, format_attrs, AttrMap};
use serde::Serialize;

/// A terminal element: a tag enclosing a scalar text value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaf {
    tag: String,
    attributes: Option<AttrMap>,
    text: String,
    /// When set, serialization breaks the line after the open tag and before
    /// the close tag instead of keeping the value inline.
    newline: bool,
}

impl Leaf {
    pub fn new<T: Into<String>, V: Into<String>>(tag: T, text: V) -> Self {
        Self {
            tag: tag.into(),
            attributes: None,
            text: text.into(),
            newline: false,
        }
    }

    pub fn with_attributes(mut self, attributes: Option<AttrMap>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> Option<&AttrMap> {
        self.attributes.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn newline(&self) -> bool {
        self.newline
    }

    pub(crate) fn serialize_into(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        out.push_str(&pad);
        out.push('<');
        out.push_str(&self.tag);
        out.push_str(&format_attrs(self.attributes()));
        out.push('>');
        if self.newline {
            out.push('\n');
        }
        out.push_str(&escape_text(&self.text));
        if self.newline {
            out.push('\n');
            out.push_str(&pad);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push_str(">\n");
    }
}
