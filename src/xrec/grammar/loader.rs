//! Grammar loader: declaration text → [`GrammarTree`]
//!
//!     The loader runs once over the declaration text, one statement per
//!     line, and materializes grammar nodes as they are declared or
//!     referenced. Root resolution happens at end of input; a grammar with
//!     zero or several parentless nodes is rejected and the condition is
//!     recorded with every candidate named.

use super::node::{Modifier, Slot};
use super::tree::{GrammarError, GrammarTree};
use crate::xrec::report::{Condition, Reporter};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// `<!ELEMENT tag (childspec)>`
static ELEMENT_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<!ELEMENT\s+([^\s(>]+)\s+\((.+)\)\s*>\s*$").unwrap());

/// `<!ATTLIST tag attrname ...>` — only the first attribute name is taken;
/// repeated ATTLIST statements register further names
static ATTLIST_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<!ATTLIST\s+([^\s>]+)\s+([^\s>]+)[^>]*>\s*$").unwrap());

/// Valid tag id inside a child specification
static TAG_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][\w.:-]*$").unwrap());

/// Parses DTD-subset declaration text into a [`GrammarTree`].
///
/// Conditions (root ambiguity, malformed rules, optional undeclared-tag
/// warnings) go to the injected [`Reporter`]; fatal ones are also returned
/// as `Err` with no partial tree.
pub struct GrammarLoader<'r> {
    reporter: &'r dyn Reporter,
    warn_undeclared: bool,
}

impl<'r> GrammarLoader<'r> {
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            reporter,
            warn_undeclared: false,
        }
    }

    /// Record a warning-severity condition for tags that are referenced in
    /// slots but never declared. Off by default: leaves are legitimately
    /// never declared in this subset.
    pub fn warn_undeclared(mut self, yes: bool) -> Self {
        self.warn_undeclared = yes;
        self
    }

    /// Load a grammar from declaration text. `source` labels the text in
    /// conditions and errors (a path, usually).
    pub fn load_str(&self, text: &str, source: &str) -> Result<GrammarTree, GrammarError> {
        let mut tree = GrammarTree::new(source);

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if let Some(caps) = ELEMENT_RULE.captures(line) {
                let parent = caps.get(1).map_or("", |m| m.as_str());
                let childspec = caps.get(2).map_or("", |m| m.as_str());
                // a tag gets exactly one element rule; a second one would
                // silently restart its slot numbering
                if tree.node(parent).map_or(false, |n| n.is_declared()) {
                    self.reporter.record(
                        Condition::fatal("DUPLICATE_ELEMENT_RULE", line.trim())
                            .in_path(source)
                            .at_line(line_no),
                    );
                    return Err(GrammarError::DuplicateRule {
                        tag: parent.to_string(),
                        line_no,
                    });
                }
                if self.apply_element_rule(&mut tree, parent, childspec).is_err() {
                    self.reporter.record(
                        Condition::fatal("MALFORMED_ELEMENT_RULE", line.trim())
                            .in_path(source)
                            .at_line(line_no),
                    );
                    return Err(GrammarError::MalformedRule {
                        line_no,
                        text: line.trim().to_string(),
                    });
                }
            } else if let Some(caps) = ATTLIST_RULE.captures(line) {
                let tag = caps.get(1).map_or("", |m| m.as_str()).to_string();
                let attrname = caps.get(2).map_or("", |m| m.as_str()).to_string();
                tree.node_mut(&tag).add_attribute(attrname);
            }
            // anything else is not a statement; ignored
        }

        if let Err(err) = tree.root() {
            self.record_root_failure(&err);
            return Err(err);
        }

        if self.warn_undeclared {
            let undeclared = tree.undeclared_referenced();
            if !undeclared.is_empty() {
                self.reporter.record(
                    Condition::warning("UNDECLARED_TAGS", undeclared.join(", "))
                        .in_path(source),
                );
            }
        }

        Ok(tree)
    }

    /// Register one element rule: the parent's slots in declaration order,
    /// plus a parent→child edge for every alternative type in every slot.
    fn apply_element_rule(
        &self,
        tree: &mut GrammarTree,
        parent: &str,
        childspec: &str,
    ) -> Result<(), ()> {
        let mut slots = Vec::new();
        for (offset, spec) in childspec.split(',').enumerate() {
            let (types, modifier) = parse_slot(spec).ok_or(())?;
            slots.push(Slot::new(offset + 1, types, modifier));
        }
        if slots.is_empty() {
            return Err(());
        }

        for slot in &slots {
            for child in slot.types() {
                tree.node_mut(child).register_parent();
            }
        }
        let node = tree.node_mut(parent);
        for slot in slots {
            node.push_slot(slot);
        }
        node.mark_declared();
        Ok(())
    }

    fn record_root_failure(&self, err: &GrammarError) {
        let condition = match err {
            GrammarError::NoRootCandidate { path } => {
                Condition::fatal("NO_ROOT_NODE", "grammar has no parentless node").in_path(path)
            }
            GrammarError::MultipleRootCandidates { candidates, path } => {
                Condition::fatal("MULTIPLE_ROOT_NODES", candidates.join(", ")).in_path(path)
            }
            other => Condition::fatal("GRAMMAR_ERROR", other.to_string()),
        };
        self.reporter.record(condition);
    }
}

/// Parse one slot of a child specification: `TYPE`, `TYPE+`, `(T1|T2)`, or
/// `(T1|T2)+`.
fn parse_slot(spec: &str) -> Option<(BTreeSet<String>, Modifier)> {
    let mut spec = spec.trim();
    let modifier = if let Some(stripped) = spec.strip_suffix('+') {
        spec = stripped.trim_end();
        Modifier::OneOrMore
    } else {
        Modifier::ExactlyOne
    };

    let inner = if spec.starts_with('(') && spec.ends_with(')') {
        &spec[1..spec.len() - 1]
    } else {
        spec
    };

    let mut types = BTreeSet::new();
    for name in inner.split('|') {
        let name = name.trim();
        if !TAG_ID.is_match(name) {
            return None;
        }
        let _ = types.insert(name.to_string());
    }
    Some((types, modifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xrec::report::CollectingReporter;

    #[test]
    fn test_element_rule_builds_slots() {
        let reporter = CollectingReporter::new();
        let tree = GrammarLoader::new(&reporter)
            .load_str("<!ELEMENT record (id,value+)>\n", "inline")
            .unwrap();

        let record = tree.node("record").unwrap();
        assert_eq!(record.slot_count(), 2);
        assert_eq!(record.slot_modifier(1), Some(Modifier::ExactlyOne));
        assert_eq!(record.slot_modifier(2), Some(Modifier::OneOrMore));
        assert!(tree.node("id").unwrap().is_leaf());
    }

    #[test]
    fn test_alternation_slot() {
        let reporter = CollectingReporter::new();
        let tree = GrammarLoader::new(&reporter)
            .load_str("<!ELEMENT record ((name|alias)+,note)>\n", "inline")
            .unwrap();

        let record = tree.node("record").unwrap();
        let types = record.slot_types(1).unwrap();
        assert!(types.contains("name") && types.contains("alias"));
        assert_eq!(record.slot_modifier(1), Some(Modifier::OneOrMore));
    }

    #[test]
    fn test_attlist_registers_attribute() {
        let reporter = CollectingReporter::new();
        let tree = GrammarLoader::new(&reporter)
            .load_str(
                "<!ELEMENT record (id)>\n<!ATTLIST record sys \"nist\">\n<!ATTLIST record kind>\n",
                "inline",
            )
            .unwrap();

        let attrs = tree.node("record").unwrap().attributes();
        assert!(attrs.contains("sys"));
        assert!(attrs.contains("kind"));
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let reporter = CollectingReporter::new();
        let tree = GrammarLoader::new(&reporter)
            .load_str(
                "<?xml version=\"1.0\"?>\n\n<!-- comment -->\n<!ELEMENT a (b)>\n",
                "inline",
            )
            .unwrap();
        assert_eq!(tree.root().unwrap().tag(), "a");
    }

    #[test]
    fn test_multiple_roots_reported_and_rejected() {
        let reporter = CollectingReporter::new();
        let result = GrammarLoader::new(&reporter)
            .load_str("<!ELEMENT a (c)>\n<!ELEMENT b (c)>\n", "two-roots.dtd");

        match result {
            Err(GrammarError::MultipleRootCandidates { candidates, path }) => {
                assert_eq!(candidates, vec!["a".to_string(), "b".to_string()]);
                assert_eq!(path, "two-roots.dtd");
            }
            other => panic!("expected MultipleRootCandidates, got {:?}", other),
        }
        assert_eq!(reporter.kinds(), vec!["MULTIPLE_ROOT_NODES"]);
    }

    #[test]
    fn test_undeclared_warning_is_opt_in() {
        let silent = CollectingReporter::new();
        let _ = GrammarLoader::new(&silent)
            .load_str("<!ELEMENT a (b)>\n", "inline")
            .unwrap();
        assert!(silent.is_empty());

        let loud = CollectingReporter::new();
        let _ = GrammarLoader::new(&loud)
            .warn_undeclared(true)
            .load_str("<!ELEMENT a (b)>\n", "inline")
            .unwrap();
        assert_eq!(loud.kinds(), vec!["UNDECLARED_TAGS"]);
    }

    #[test]
    fn test_malformed_childspec_is_fatal() {
        let reporter = CollectingReporter::new();
        let result =
            GrammarLoader::new(&reporter).load_str("<!ELEMENT a (b,,c)>\n", "bad.dtd");
        match result {
            Err(GrammarError::MalformedRule { line_no, .. }) => assert_eq!(line_no, 1),
            other => panic!("expected MalformedRule, got {:?}", other),
        }
        assert_eq!(reporter.kinds(), vec!["MALFORMED_ELEMENT_RULE"]);
    }

    #[test]
    fn test_redeclared_tag_is_rejected() {
        let reporter = CollectingReporter::new();
        let result = GrammarLoader::new(&reporter)
            .load_str("<!ELEMENT a (b)>\n<!ELEMENT a (c)>\n", "dup.dtd");
        match result {
            Err(GrammarError::DuplicateRule { tag, line_no }) => {
                assert_eq!(tag, "a");
                assert_eq!(line_no, 2);
            }
            other => panic!("expected DuplicateRule, got {:?}", other),
        }
        assert_eq!(reporter.kinds(), vec!["DUPLICATE_ELEMENT_RULE"]);
    }

    #[test]
    fn test_forward_reference_then_declaration() {
        let reporter = CollectingReporter::new();
        let tree = GrammarLoader::new(&reporter)
            .load_str("<!ELEMENT a (b)>\n<!ELEMENT b (c,d)>\n", "inline")
            .unwrap();
        // b was created on reference, then filled in by its own rule
        let b = tree.node("b").unwrap();
        assert!(b.is_declared());
        assert_eq!(b.slot_count(), 2);
        assert!(b.has_parent());
    }
}
