//! manualqa-rerank
//!
//! Second-stage ranking: scores (query, chunk) pairs with a relevance
//! model and reorders the retrieved candidates. The cross-encoder needs
//! model files; the overlap scorer is the offline fallback.

pub mod cross_encoder;
pub mod overlap;
pub mod reranker;

pub use cross_encoder::CrossEncoder;
pub use overlap::OverlapScorer;
pub use reranker::Reranker;

use manualqa_core::error::Result;
use manualqa_core::traits::PairScorer;
use std::path::Path;

/// Builds the pair scorer selected by the configured model identifier:
/// the literal `"overlap"` picks the builtin fallback, anything else is
/// treated as a local model directory.
pub fn build_scorer(model_id: &str) -> Result<Box<dyn PairScorer>> {
    if model_id == "overlap" {
        tracing::debug!("using term-overlap pair scorer");
        return Ok(Box::new(OverlapScorer));
    }
    Ok(Box::new(CrossEncoder::load(Path::new(model_id))?))
}
