//! Grammar node: one declared tag and its child-slot/attribute rules

use std::collections::BTreeSet;

/// Occurrence constraint on a child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// The slot matches exactly one instance.
    ExactlyOne,
    /// The slot matches one or more consecutive instances.
    OneOrMore,
}

/// A numbered position in a parent's child rule.
///
/// Positions are 1-based and contiguous in declaration order. One slot may
/// allow several alternative tag ids; slot identity is positional, not
/// per-type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    position: usize,
    types: BTreeSet<String>,
    modifier: Modifier,
}

impl Slot {
    pub fn new(position: usize, types: BTreeSet<String>, modifier: Modifier) -> Self {
        Self {
            position,
            types,
            modifier,
        }
    }

    /// 1-based position of this slot in the parent's child rule
    pub fn position(&self) -> usize {
        self.position
    }

    /// The set of tag ids this slot accepts
    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    /// Whether the slot accepts the given tag id
    pub fn allows(&self, tag: &str) -> bool {
        self.types.contains(tag)
    }

    /// The slot's single allowed type, if it is not an alternation
    pub fn single_type(&self) -> Option<&str> {
        if self.types.len() == 1 {
            self.types.iter().next().map(|s| s.as_str())
        } else {
            None
        }
    }
}

/// One declared tag: its ordered child slots and allowed attribute names.
///
/// A node also tracks how many times it was registered as some parent's
/// child; that count only ever feeds the "has no parent" test used for root
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarNode {
    tag: String,
    slots: Vec<Slot>,
    attributes: BTreeSet<String>,
    parent_edges: usize,
    declared: bool,
}

impl GrammarNode {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            slots: Vec::new(),
            attributes: BTreeSet::new(),
            parent_edges: 0,
            declared: false,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// A leaf declares zero child slots
    pub fn is_leaf(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot at a 1-based position
    pub fn slot(&self, position: usize) -> Option<&Slot> {
        if position == 0 {
            return None;
        }
        self.slots.get(position - 1)
    }

    /// Allowed tag ids at a 1-based slot position
    pub fn slot_types(&self, position: usize) -> Option<&BTreeSet<String>> {
        self.slot(position).map(Slot::types)
    }

    /// Modifier at a 1-based slot position
    pub fn slot_modifier(&self, position: usize) -> Option<Modifier> {
        self.slot(position).map(Slot::modifier)
    }

    /// Declared attribute names, in sorted order
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    /// Whether any parent→child edge targets this node
    pub fn has_parent(&self) -> bool {
        self.parent_edges > 0
    }

    /// Whether an `<!ELEMENT>` rule for this tag was processed
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub(crate) fn push_slot(&mut self, slot: Slot) {
        debug_assert_eq!(slot.position(), self.slots.len() + 1);
        self.slots.push(slot);
    }

    pub(crate) fn add_attribute<S: Into<String>>(&mut self, name: S) {
        let _ = self.attributes.insert(name.into());
    }

    pub(crate) fn register_parent(&mut self) {
        self.parent_edges += 1;
    }

    pub(crate) fn mark_declared(&mut self) {
        self.declared = true;
    }
}
