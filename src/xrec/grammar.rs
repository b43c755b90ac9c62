//! Grammar model for the DTD-subset declarations
//!
//!     A grammar is a set of tag declarations. Each declared tag carries an
//!     ordered list of child slots (each slot allowing one or more alternative
//!     tag ids, with an occurrence modifier) and a set of attribute names.
//!     The grammar forms a tree: exactly one tag is never registered as any
//!     other tag's child, and that tag is the root.
//!
//! Declarations
//!
//!     The declaration text is line-oriented. Two statement forms are
//!     recognized (everything else is ignored):
//!
//!         <!ELEMENT parent (child1,child2+,(alt1|alt2),...)>
//!         <!ATTLIST tag attrname ...>
//!
//!     A trailing `+` on a slot means the slot may repeat (one or more
//!     occurrences); otherwise the slot matches exactly once. A parenthesized
//!     `|`-separated group lists alternative tag ids for one slot.
//!
//!     Tags referenced in a slot before (or without ever) being declared are
//!     still valid grammar nodes: they are created on first reference with
//!     empty slots and attributes. Leaf tags are typically never declared at
//!     all in this subset.

pub mod loader;
pub mod node;
pub mod tree;

pub use loader::GrammarLoader;
pub use node::{GrammarNode, Modifier, Slot};
pub use tree::{GrammarError, GrammarTree};
