//! Decomposition: raw record spans → typed element trees
//!
//!     The decomposer walks a span's lines against the grammar node that
//!     encloses it. Matching is positional with one-slot lookahead and no
//!     backtracking: a cursor starts at slot 1 and only advances when a line
//!     matches the *next* slot's types — never merely because one instance
//!     was consumed, so `+`-modified slots repeat naturally. Child spans
//!     accumulate line by line and recurse.

pub mod decomposer;

pub use decomposer::{DecomposeError, Decomposer};
