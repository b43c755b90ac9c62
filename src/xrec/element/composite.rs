//! Composite element: ordered children under one tag

use super::attributes::{format_attrs, AttrMap};
use super::Element;
use serde::Serialize;

/// An element with an ordered sequence of children. Order is document order
/// and significant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composite {
    tag: String,
    attributes: Option<AttrMap>,
    children: Vec<Element>,
}

impl Composite {
    pub fn new<T: Into<String>>(tag: T) -> Self {
        Self {
            tag: tag.into(),
            attributes: None,
            children: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Option<AttrMap>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> Option<&AttrMap> {
        self.attributes.as_ref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub(crate) fn serialize_into(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        out.push_str(&pad);
        out.push('<');
        out.push_str(&self.tag);
        out.push_str(&format_attrs(self.attributes()));
        out.push_str(">\n");
        for child in &self.children {
            child.serialize_into(out, indent + 1);
        }
        out.push_str(&pad);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push_str(">\n");
    }
}
