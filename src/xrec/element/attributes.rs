//! Attribute substring parsing and emission

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Attribute key → value mapping. A `BTreeMap` keeps emission order
/// deterministic (sorted by key).
pub type AttrMap = BTreeMap<String, String>;

/// `key="value"` pairs inside an opening tag's attribute substring
static ATTR_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*"([^"]*)""#).unwrap());

/// Parse an opening tag's attribute substring.
///
/// `None` in means `None` out: a tag with no attribute substring stays
/// distinct from one with an empty or unparseable substring. On duplicate
/// keys the last occurrence wins.
pub fn parse_attr_text(attr_text: Option<&str>) -> Option<AttrMap> {
    let text = attr_text?;
    let mut map = AttrMap::new();
    for caps in ATTR_PAIR.captures_iter(text) {
        let key = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str());
        let _ = map.insert(key.to_string(), value.to_string());
    }
    Some(map)
}

/// Emit an attribute set for an opening tag: `` key="value" ...`` with keys
/// in sorted order, or the empty string for the no-attributes state.
pub fn format_attrs(attrs: Option<&AttrMap>) -> String {
    let Some(attrs) = attrs else {
        return String::new();
    };
    let mut out = String::new();
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out
}

/// Escape leaf text for emission
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Invert [`escape_text`] when capturing leaf text back out of a span
pub fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
