//! Span scanning: pulling raw top-level record spans off an input stream
//!
//!     The scanner walks a line-oriented stream with a forward-only cursor
//!     and yields the raw text span of each successive top-level record.
//!     Records are instances of the grammar root's slot-1 child types — the
//!     root tag itself never appears in the stream. Lines outside any span
//!     are discarded; nothing is buffered beyond the span being accumulated.

pub mod scanner;

pub use scanner::{ScanError, Span, SpanScanner};
