//! # xrec
//!
//! A grammar-driven decomposer for line-oriented XML-like record streams.
//!
//! A constrained DTD subset (`<!ELEMENT …>` / `<!ATTLIST …>` declarations)
//! describes which tags exist, the ordered child slots each tag allows, and
//! the attributes it may carry. Against that grammar, `xrec` scans a
//! line-oriented input stream for successive top-level record spans and
//! decomposes each one into a typed element tree — no general-purpose XML
//! parser involved.
//!
//! ## Testing
//!
//! Tests use the verified sample grammars and record streams in the
//! [testing module](xrec::testing); see that module for the rules.

pub mod xrec;
