//! Main module for xrec library functionality

pub mod decomposing;
pub mod element;
pub mod grammar;
pub mod loader;
pub mod report;
pub mod scanning;
pub mod tags;
pub mod testing;
