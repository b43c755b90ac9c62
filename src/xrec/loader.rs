//! Record loading utilities
//!
//! This module provides `RecordLoader` - a facade for loading a grammar from
//! a file or string and decomposing record streams against it. Used by both
//! the CLI and tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use xrec::xrec::loader::RecordLoader;
//! use xrec::xrec::report::StderrReporter;
//!
//! let reporter = StderrReporter;
//! let loader = RecordLoader::from_grammar_path("records.dtd", &reporter)?;
//! for record in loader.decompose_path("input.txt")? {
//!     println!("{}", record.serialize(0));
//! }
//! ```

use crate::xrec::decomposing::{DecomposeError, Decomposer};
use crate::xrec::element::Element;
use crate::xrec::grammar::{GrammarError, GrammarLoader, GrammarTree};
use crate::xrec::report::{Condition, Reporter};
use crate::xrec::scanning::{ScanError, SpanScanner};
use std::fmt;
use std::fs;
use std::io::{BufRead, Cursor};
use std::path::Path;

/// Error that can occur when loading grammars or decomposing record streams
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading a grammar or input file
    Io(String),
    /// Grammar loading or lookup error
    Grammar(GrammarError),
    /// Span scanning error
    Scan(ScanError),
    /// Decomposition error
    Decompose(DecomposeError),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::Io(msg) => write!(f, "IO error: {}", msg),
            LoaderError::Grammar(err) => write!(f, "Grammar error: {}", err),
            LoaderError::Scan(err) => write!(f, "Scan error: {}", err),
            LoaderError::Decompose(err) => write!(f, "Decompose error: {}", err),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<GrammarError> for LoaderError {
    fn from(err: GrammarError) -> Self {
        LoaderError::Grammar(err)
    }
}

impl From<ScanError> for LoaderError {
    fn from(err: ScanError) -> Self {
        LoaderError::Scan(err)
    }
}

impl From<DecomposeError> for LoaderError {
    fn from(err: DecomposeError) -> Self {
        LoaderError::Decompose(err)
    }
}

/// Grammar-plus-reporter facade for decomposing record streams.
///
/// The grammar is loaded once and read-only afterwards; every record stream
/// handed to this loader is scanned and decomposed against it.
pub struct RecordLoader<'r> {
    grammar: GrammarTree,
    reporter: &'r dyn Reporter,
}

impl<'r> RecordLoader<'r> {
    /// Wrap an already-loaded grammar
    pub fn new(grammar: GrammarTree, reporter: &'r dyn Reporter) -> Self {
        Self { grammar, reporter }
    }

    /// Load the grammar from a declaration file
    pub fn from_grammar_path<P: AsRef<Path>>(
        path: P,
        reporter: &'r dyn Reporter,
    ) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            reporter.record(
                Condition::fatal("MISSING_FILE", e.to_string())
                    .in_path(path.display().to_string()),
            );
            LoaderError::Io(e.to_string())
        })?;
        Self::from_grammar_str(&text, &path.display().to_string(), reporter)
    }

    /// Load the grammar from declaration text
    pub fn from_grammar_str(
        text: &str,
        source: &str,
        reporter: &'r dyn Reporter,
    ) -> Result<Self, LoaderError> {
        let grammar = GrammarLoader::new(reporter).load_str(text, source)?;
        Ok(Self { grammar, reporter })
    }

    pub fn grammar(&self) -> &GrammarTree {
        &self.grammar
    }

    /// Decompose every record in an input file
    pub fn decompose_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Element>, LoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            self.reporter.record(
                Condition::fatal("MISSING_FILE", e.to_string())
                    .in_path(path.display().to_string()),
            );
            LoaderError::Io(e.to_string())
        })?;
        self.decompose_str(&text)
    }

    /// Decompose every record in an input string
    pub fn decompose_str(&self, input: &str) -> Result<Vec<Element>, LoaderError> {
        self.records(Cursor::new(input.to_string()))?.collect()
    }

    /// Stream records out of a reader one element tree at a time
    pub fn records<R: BufRead>(&self, reader: R) -> Result<Records<'_, R>, LoaderError> {
        let scanner = SpanScanner::new(reader, &self.grammar)?;
        Ok(Records {
            scanner,
            decomposer: Decomposer::new(&self.grammar, self.reporter),
        })
    }
}

/// Lazy sequence of decomposed records from one input stream.
///
/// Forward-only: the underlying stream cursor only advances, and the
/// sequence ends for good at the first `None`.
pub struct Records<'a, R: BufRead> {
    scanner: SpanScanner<R>,
    decomposer: Decomposer<'a>,
}

impl<'a, R: BufRead> Iterator for Records<'a, R> {
    type Item = Result<Element, LoaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scanner.next_span() {
            Ok(Some(span)) => Some(
                self.decomposer
                    .decompose_span(&span)
                    .map_err(LoaderError::from),
            ),
            Ok(None) => None,
            Err(err) => Some(Err(err.into())),
        }
    }
}
