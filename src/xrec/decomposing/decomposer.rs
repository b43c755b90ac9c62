//! Recursive span decomposer

use crate::xrec::element::attributes::{parse_attr_text, unescape_text};
use crate::xrec::element::{Composite, Element, Leaf};
use crate::xrec::grammar::{GrammarError, GrammarNode, GrammarTree, Modifier};
use crate::xrec::report::{Condition, Reporter};
use crate::xrec::scanning::Span;
use crate::xrec::tags::FormCache;
use std::fmt;

/// Errors produced while decomposing a span
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecomposeError {
    /// The expected enclosing open/close tag pair was not found
    MalformedEnclosingTag { tag: String, context: String },
    /// A line matched neither the current slot nor the next one
    UnmatchedLine {
        line_no: usize,
        line: String,
        slot: usize,
    },
    /// The body ended while a child span was still open
    UnterminatedChild { tag: String },
    /// The grammar had no node for a tag the algorithm needed
    Grammar(GrammarError),
}

impl fmt::Display for DecomposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecomposeError::MalformedEnclosingTag { tag, context } => {
                write!(f, "Malformed enclosing tag '{}' in: {}", tag, context)
            }
            DecomposeError::UnmatchedLine {
                line_no,
                line,
                slot,
            } => write!(
                f,
                "Line {} matched neither slot {} nor slot {}: {}",
                line_no,
                slot,
                slot + 1,
                line
            ),
            DecomposeError::UnterminatedChild { tag } => {
                write!(f, "Body ended inside an open '{}' child span", tag)
            }
            DecomposeError::Grammar(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DecomposeError {}

impl From<GrammarError> for DecomposeError {
    fn from(err: GrammarError) -> Self {
        DecomposeError::Grammar(err)
    }
}

/// Converts raw [`Span`]s into [`Element`] trees by recursive,
/// grammar-directed matching.
///
/// Single-threaded and synchronous; the grammar is consulted read-only and
/// the produced trees are exclusively owned by the caller. Fatal conditions
/// go to the injected [`Reporter`] and come back as `Err` — the decomposer
/// never terminates the process and never yields a partial tree.
pub struct Decomposer<'a> {
    grammar: &'a GrammarTree,
    reporter: &'a dyn Reporter,
    forms: FormCache,
}

impl<'a> Decomposer<'a> {
    pub fn new(grammar: &'a GrammarTree, reporter: &'a dyn Reporter) -> Self {
        Self {
            grammar,
            reporter,
            forms: FormCache::new(),
        }
    }

    /// Decompose a span against the grammar node of its own tag.
    pub fn decompose_span(&mut self, span: &Span) -> Result<Element, DecomposeError> {
        let node = self.grammar.node(span.tag())?;
        self.decompose(span, node)
    }

    /// Decompose a span against an explicit grammar node.
    pub fn decompose(
        &mut self,
        span: &Span,
        node: &GrammarNode,
    ) -> Result<Element, DecomposeError> {
        self.decompose_body(&span.text(), node)
    }

    fn decompose_body(
        &mut self,
        body: &str,
        node: &GrammarNode,
    ) -> Result<Element, DecomposeError> {
        let stripped = self.forms.forms(node.tag()).strip(body);
        let Some((attr_text, inner)) = stripped else {
            return Err(self.malformed(node.tag(), body));
        };
        let attrs = parse_attr_text(attr_text.as_deref());

        // a leaf node encloses its scalar value directly
        if node.is_leaf() {
            let (text, newline) = leaf_text(inner);
            return Ok(Leaf::new(node.tag(), text)
                .with_attributes(attrs)
                .with_newline(newline)
                .into());
        }

        // single slot, exactly one, unambiguous type: direct dispatch
        let single_type = (node.slot_count() == 1
            && node.slot_modifier(1) == Some(Modifier::ExactlyOne))
        .then(|| node.slot(1).and_then(|s| s.single_type()))
        .flatten()
        .map(str::to_string);

        if let Some(child_tag) = single_type {
            let grammar = self.grammar;
            let child = grammar.node(&child_tag)?;
            if child.is_leaf() {
                // the inner body is the scalar value itself
                let (text, newline) = leaf_text(inner);
                return Ok(Leaf::new(node.tag(), text)
                    .with_attributes(attrs)
                    .with_newline(newline)
                    .into());
            }
            let inner_element = self.decompose_body(inner, child)?;
            return Ok(Composite::new(node.tag())
                .with_attributes(attrs)
                .with_child(inner_element)
                .into());
        }

        // multiple slots, repetition, or alternation: line cursor machine
        let children = self.match_children(node, inner)?;
        Ok(Composite::new(node.tag())
            .with_attributes(attrs)
            .with_children(children)
            .into())
    }

    /// The slot cursor machine. Positional matching with one-slot lookahead
    /// and no backtracking; linear in the number of body lines.
    fn match_children(
        &mut self,
        node: &GrammarNode,
        inner: &str,
    ) -> Result<Vec<Element>, DecomposeError> {
        let mut lines: Vec<&str> = inner.lines().collect();
        let mut children = Vec::new();
        let mut cursor = 1usize;
        let mut open: Option<(String, Vec<String>)> = None;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if let Some((tag, acc)) = &mut open {
                acc.push(line.to_string());
                let closed = self.forms.forms(tag).closes(line);
                if closed {
                    if let Some((tag, acc)) = open.take() {
                        children.push(self.decompose_child(&tag, &acc)?);
                    }
                }
                i += 1;
                continue;
            }

            // layout-only blank lines carry no record content
            if line.trim().is_empty() {
                i += 1;
                continue;
            }

            if let Some(tag) = self.match_slot(node, cursor, line) {
                let split = self
                    .forms
                    .forms(&tag)
                    .split_leading(line)
                    .map(|(instance, rest)| (instance.to_string(), rest));
                if let Some((instance, rest)) = split {
                    // immediate close; the cursor stays put so `+` slots repeat
                    children.push(self.decompose_child(&tag, &[instance])?);
                    if rest.trim().is_empty() {
                        i += 1;
                    } else {
                        // further instances share the line; reprocess the tail
                        lines[i] = rest;
                    }
                } else {
                    open = Some((tag, vec![line.to_string()]));
                    i += 1;
                }
            } else if self.match_slot(node, cursor + 1, line).is_some() {
                // one-slot lookahead: advance and reprocess this same line
                cursor += 1;
            } else {
                self.reporter.record(
                    Condition::fatal("UNMATCHED_LINE", line).at_line(i + 1),
                );
                return Err(DecomposeError::UnmatchedLine {
                    line_no: i + 1,
                    line: line.to_string(),
                    slot: cursor,
                });
            }
        }

        if let Some((tag, _)) = open {
            self.reporter
                .record(Condition::fatal("UNTERMINATED_CHILD", tag.as_str()));
            return Err(DecomposeError::UnterminatedChild { tag });
        }
        Ok(children)
    }

    /// Which of the slot's types opens this line, if any
    fn match_slot(&mut self, node: &GrammarNode, position: usize, line: &str) -> Option<String> {
        let slot = node.slot(position)?;
        for tag in slot.types() {
            if self.forms.forms(tag).opens(line) {
                return Some(tag.clone());
            }
        }
        None
    }

    fn decompose_child(&mut self, tag: &str, lines: &[String]) -> Result<Element, DecomposeError> {
        let grammar = self.grammar;
        let child = grammar.node(tag)?;
        self.decompose_body(&lines.join("\n"), child)
    }

    fn malformed(&self, tag: &str, body: &str) -> DecomposeError {
        let context: String = body.chars().take(80).collect();
        self.reporter
            .record(Condition::fatal("MALFORMED_ENCLOSING_TAG", context.clone()));
        DecomposeError::MalformedEnclosingTag {
            tag: tag.to_string(),
            context,
        }
    }
}

/// Scalar text of a leaf body, with the newline-on-serialize flag it implies.
/// Inline bodies keep their text byte-for-byte; multi-line bodies trim the
/// layout whitespace and remember to serialize with line breaks.
fn leaf_text(inner: &str) -> (String, bool) {
    if inner.contains('\n') {
        (unescape_text(inner.trim()), true)
    } else {
        (unescape_text(inner), false)
    }
}
