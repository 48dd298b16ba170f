//! Vector search over indexed passages

pub mod index;

pub use index::{IndexEntry, SearchResult, VectorIndex};
