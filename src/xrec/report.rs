//! Problem reporting sink
//!
//!     The core reports conditions (fatal parse failures, grammar warnings)
//!     to an injected [`Reporter`] rather than to any global state. The core
//!     never terminates the process; callers own termination policy. Fatal
//!     conditions are both recorded here and returned as `Err` from the
//!     operation that hit them.

use std::cell::RefCell;
use std::fmt;

/// How serious a recorded condition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Fatal,
}

/// One recorded condition: kind code, human-readable message, and the source
/// location it was observed at, when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub severity: Severity,
    pub kind: &'static str,
    pub message: String,
    pub path: Option<String>,
    pub line: Option<usize>,
}

impl Condition {
    pub fn fatal<S: Into<String>>(kind: &'static str, message: S) -> Self {
        Self {
            severity: Severity::Fatal,
            kind,
            message: message.into(),
            path: None,
            line: None,
        }
    }

    pub fn warning<S: Into<String>>(kind: &'static str, message: S) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            path: None,
            line: None,
        }
    }

    /// Attach the source path the condition was observed in
    pub fn in_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the 1-based source line the condition was observed at
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Fatal => "fatal",
        };
        write!(f, "{} [{}] {}", severity, self.kind, self.message)?;
        match (&self.path, self.line) {
            (Some(path), Some(line)) => write!(f, " ({}:{})", path, line),
            (Some(path), None) => write!(f, " ({})", path),
            _ => Ok(()),
        }
    }
}

/// Sink for conditions recorded by the loader, scanner and decomposer.
///
/// Implementations decide what recording means: print, collect, forward.
/// The trait is object-safe; components take `&dyn Reporter`.
pub trait Reporter {
    fn record(&self, condition: Condition);
}

/// Reporter that prints every condition to stderr. Used by the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn record(&self, condition: Condition) {
        eprintln!("{}", condition);
    }
}

/// Reporter that collects conditions in memory. Used by tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    conditions: RefCell<Vec<Condition>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn conditions(&self) -> Vec<Condition> {
        self.conditions.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.borrow().is_empty()
    }

    /// Kinds of all recorded conditions, in record order
    pub fn kinds(&self) -> Vec<&'static str> {
        self.conditions.borrow().iter().map(|c| c.kind).collect()
    }
}

impl Reporter for CollectingReporter {
    fn record(&self, condition: Condition) {
        self.conditions.borrow_mut().push(condition);
    }
}
