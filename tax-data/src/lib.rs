//! Bracket table sources: CSV and JSON loaders with validation.

mod loader;

pub use loader::{BracketRecord, BracketTableLoader, TableFormat, TableLoadError, UpperBound};
