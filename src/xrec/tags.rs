//! Opening/closing tag line forms
//!
//!     Both the span scanner and the decomposer classify lines by whether
//!     they open or close a given tag. [`TagForms`] compiles the two regexes
//!     for one tag once; [`FormCache`] memoizes them per tag id so the
//!     decomposer's recursion never recompiles a pattern.
//!
//!     An opening form is `<tag>` or `<tag attrs...>` at the start of a line
//!     (leading whitespace allowed); a closing form is `</tag>`. Matching is
//!     by tag name only — nested occurrences of the same tag are not
//!     tracked and are unsupported in this record format.

use regex::Regex;
use std::collections::HashMap;

/// Compiled opening/closing forms for one tag id.
#[derive(Debug)]
pub struct TagForms {
    tag: String,
    open: Regex,
    close: Regex,
}

/// An opening-form match: the attribute substring, when the tag carried one,
/// and the byte offset just past the `>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    /// `None` when the tag had no attribute substring at all — distinct from
    /// an empty one
    pub attr_text: Option<String>,
    pub end: usize,
}

impl TagForms {
    pub fn new(tag: &str) -> Self {
        let escaped = regex::escape(tag);
        // group 1 captures the substring between the tag name and `>`
        let open = Regex::new(&format!(r"^\s*<{}(\s[^>]*)?>", escaped))
            .unwrap_or_else(|e| panic!("tag form regex for '{}': {}", tag, e));
        let close = Regex::new(&format!(r"</{}\s*>", escaped))
            .unwrap_or_else(|e| panic!("tag form regex for '{}': {}", tag, e));
        Self {
            tag: tag.to_string(),
            open,
            close,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether the line starts with this tag's opening form
    pub fn opens(&self, line: &str) -> bool {
        self.open.is_match(line)
    }

    /// Whether the line contains this tag's closing form
    pub fn closes(&self, line: &str) -> bool {
        self.close.is_match(line)
    }

    /// Match the opening form at the start of `text`
    pub fn open_match(&self, text: &str) -> Option<OpenTag> {
        let caps = self.open.captures(text)?;
        let whole = caps.get(0)?;
        Some(OpenTag {
            attr_text: caps.get(1).map(|m| m.as_str().to_string()),
            end: whole.end(),
        })
    }

    /// Strip the enclosing open/close pair of this tag from `body`.
    ///
    /// The opening form must start the body and the closing form must end it
    /// (trailing whitespace allowed). Returns the attribute substring and the
    /// inner text, or `None` when either form is missing — the caller treats
    /// that as a malformed enclosing tag.
    pub fn strip<'t>(&self, body: &'t str) -> Option<(Option<String>, &'t str)> {
        let open = self.open_match(body)?;
        // the first closing occurrence after the open must end the body;
        // anything after it means a second same-named instance or stray text
        let m = self.close.find_at(body, open.end)?;
        if !body[m.end()..].trim().is_empty() {
            return None;
        }
        Some((open.attr_text, &body[open.end..m.start()]))
    }

    /// Split the leading complete `<tag>...</tag>` instance off `line`,
    /// returning the instance text and the rest of the line after it.
    ///
    /// `None` when the line does not open with this tag or never closes it;
    /// the caller then treats the line as the start of a multi-line span.
    pub fn split_leading<'t>(&self, line: &'t str) -> Option<(&'t str, &'t str)> {
        let open = self.open_match(line)?;
        let close = self.close.find_at(line, open.end)?;
        Some((&line[..close.end()], &line[close.end()..]))
    }
}

/// Per-tag memo of compiled [`TagForms`].
#[derive(Debug, Default)]
pub struct FormCache {
    forms: HashMap<String, TagForms>,
}

impl FormCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forms(&mut self, tag: &str) -> &TagForms {
        self.forms
            .entry(tag.to_string())
            .or_insert_with(|| TagForms::new(tag))
    }
}
