//! manualqa-pipeline
//!
//! Sequences the three stages per query: hybrid retrieval, reranking,
//! grounded generation. Stateless across queries; a failed stage aborts
//! the current query only.

pub mod builder;
pub mod pipeline;

pub use builder::build_pipeline;
pub use pipeline::{Pipeline, PipelineBudgets};
