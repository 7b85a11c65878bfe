//! manualqa-text
//!
//! Tantivy-based lexical (BM25) search over manual chunks. The index lives
//! in RAM and is rebuilt from the chunk snapshot at startup.

pub mod index;
pub mod tantivy_utils;

pub use index::LexicalSearchIndex;
