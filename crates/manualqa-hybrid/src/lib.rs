//! manualqa-hybrid
//!
//! Hybrid retrieval: a lexical pool and a semantic pool fused with
//! Reciprocal Rank Fusion, hydrated against the chunk snapshot.

pub mod fusion;
pub mod retriever;

pub use fusion::{rrf_fuse, FusedHit};
pub use retriever::HybridRetriever;
