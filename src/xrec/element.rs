//! Element model: the typed trees produced by decomposition
//!
//!     Decomposing a record span yields a tree of elements. A leaf holds a
//!     scalar text value; a composite holds an ordered sequence of child
//!     elements (document order, significant for serialization and for
//!     matching against grammar slot order). Either kind may carry an
//!     attribute set — and "no attributes at all" is distinct from "an empty
//!     attribute set".
//!
//!     Element trees are plain owned values: once built they carry no
//!     back-reference to the grammar that shaped them.

pub mod attributes;
pub mod composite;
pub mod leaf;

pub use attributes::AttrMap;
pub use composite::Composite;
pub use leaf::Leaf;

use serde::Serialize;

/// A decomposed element: terminal scalar value or ordered-children node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Leaf(Leaf),
    Composite(Composite),
}

impl Element {
    pub fn tag(&self) -> &str {
        match self {
            Element::Leaf(leaf) => leaf.tag(),
            Element::Composite(composite) => composite.tag(),
        }
    }

    /// The element's attribute set; `None` means the opening tag carried no
    /// attribute substring at all.
    pub fn attributes(&self) -> Option<&AttrMap> {
        match self {
            Element::Leaf(leaf) => leaf.attributes(),
            Element::Composite(composite) => composite.attributes(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Element::Leaf(_))
    }

    /// Child elements, empty for leaves
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Leaf(_) => &[],
            Element::Composite(composite) => composite.children(),
        }
    }

    /// First element with the given tag in pre-order document order, the
    /// element itself included. Returns `None` when the tag is absent
    /// anywhere in the tree.
    pub fn child_by_tag(&self, tag: &str) -> Option<&Element> {
        if self.tag() == tag {
            return Some(self);
        }
        for child in self.children() {
            if let Some(found) = child.child_by_tag(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Reconstruct the tagged-text form of this tree.
    ///
    /// Attribute emission order is deterministic (sorted by key). `indent`
    /// is the nesting depth to start at; each level indents by two spaces.
    pub fn serialize(&self, indent: usize) -> String {
        let mut out = String::new();
        self.serialize_into(&mut out, indent);
        out
    }

    pub(crate) fn serialize_into(&self, out: &mut String, indent: usize) {
        match self {
            Element::Leaf(leaf) => leaf.serialize_into(out, indent),
            Element::Composite(composite) => composite.serialize_into(out, indent),
        }
    }
}

impl From<Leaf> for Element {
    fn from(leaf: Leaf) -> Self {
        Element::Leaf(leaf)
    }
}

impl From<Composite> for Element {
    fn from(composite: Composite) -> Self {
        Element::Composite(composite)
    }
}
