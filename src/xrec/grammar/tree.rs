//! Grammar tree: tag-id → node mapping with root resolution

use super::node::GrammarNode;
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Errors produced by grammar loading and lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Lookup of a tag id with no grammar node
    UnknownTag { tag: String },
    /// No parentless node exists in the grammar
    NoRootCandidate { path: String },
    /// More than one parentless node exists in the grammar
    MultipleRootCandidates { candidates: Vec<String>, path: String },
    /// The root declares no child slots, so there is no record type to scan for
    RootWithoutChildren { tag: String },
    /// An `<!ELEMENT>` statement whose child specification does not parse
    MalformedRule { line_no: usize, text: String },
    /// A second `<!ELEMENT>` statement for an already-declared tag
    DuplicateRule { tag: String, line_no: usize },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UnknownTag { tag } => {
                write!(f, "Unknown tag id '{}'", tag)
            }
            GrammarError::NoRootCandidate { path } => {
                write!(f, "Grammar '{}' has no parentless node to act as root", path)
            }
            GrammarError::MultipleRootCandidates { candidates, path } => {
                write!(
                    f,
                    "Grammar '{}' has multiple root candidates: {}",
                    path,
                    candidates.join(", ")
                )
            }
            GrammarError::RootWithoutChildren { tag } => {
                write!(f, "Root tag '{}' declares no child slots", tag)
            }
            GrammarError::MalformedRule { line_no, text } => {
                write!(f, "Malformed element rule at line {}: {}", line_no, text)
            }
            GrammarError::DuplicateRule { tag, line_no } => {
                write!(f, "Tag '{}' redeclared at line {}", tag, line_no)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// The full grammar: a mapping of tag id to [`GrammarNode`], plus lazy root
/// resolution.
///
/// Built once by [`GrammarLoader`](super::loader::GrammarLoader) and read-only
/// afterwards. The root is the unique node with no registered parent edge;
/// it is resolved on first request and cached.
#[derive(Debug)]
pub struct GrammarTree {
    nodes: BTreeMap<String, GrammarNode>,
    root: OnceCell<String>,
    source: String,
}

impl GrammarTree {
    pub(crate) fn new<S: Into<String>>(source: S) -> Self {
        Self {
            nodes: BTreeMap::new(),
            root: OnceCell::new(),
            source: source.into(),
        }
    }

    /// Look up the node for a tag id.
    ///
    /// Lookup is fallible: only the loader materializes nodes, so an unknown
    /// tag here means the grammar never mentioned it.
    pub fn node(&self, tag: &str) -> Result<&GrammarNode, GrammarError> {
        self.nodes.get(tag).ok_or_else(|| GrammarError::UnknownTag {
            tag: tag.to_string(),
        })
    }

    /// Get or create the node for a tag id. Loader-only.
    pub(crate) fn node_mut(&mut self, tag: &str) -> &mut GrammarNode {
        self.nodes
            .entry(tag.to_string())
            .or_insert_with(|| GrammarNode::new(tag))
    }

    /// Tag ids of all parentless nodes, in sorted order
    pub fn root_candidates(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| !n.has_parent())
            .map(GrammarNode::tag)
            .collect()
    }

    /// The distinguished root: the unique parentless node.
    ///
    /// Resolved lazily on first request and cached for the lifetime of the
    /// tree. Zero or more than one candidate is a [`GrammarError`].
    pub fn root(&self) -> Result<&GrammarNode, GrammarError> {
        let tag = self.root.get_or_try_init(|| {
            let candidates = self.root_candidates();
            match candidates.as_slice() {
                [only] => Ok(only.to_string()),
                [] => Err(GrammarError::NoRootCandidate {
                    path: self.source.clone(),
                }),
                many => Err(GrammarError::MultipleRootCandidates {
                    candidates: many.iter().map(|s| s.to_string()).collect(),
                    path: self.source.clone(),
                }),
            }
        })?;
        self.node(tag)
    }

    /// The tag ids allowed at slot 1 of the root.
    ///
    /// Top-level records in the input stream are instances of these types —
    /// the root tag itself never appears in the stream (observed contract of
    /// the record format).
    pub fn root_child_types(&self) -> Result<&BTreeSet<String>, GrammarError> {
        let root = self.root()?;
        root.slot_types(1)
            .ok_or_else(|| GrammarError::RootWithoutChildren {
                tag: root.tag().to_string(),
            })
    }

    /// Tags that appear in some slot but were never themselves declared.
    ///
    /// Leaves legitimately show up here; the loader only surfaces the list as
    /// a warning when asked to.
    pub fn undeclared_referenced(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| n.has_parent() && !n.is_declared())
            .map(GrammarNode::tag)
            .collect()
    }
}
