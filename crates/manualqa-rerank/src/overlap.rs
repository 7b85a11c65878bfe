use std::collections::HashSet;

use manualqa_core::error::Result;
use manualqa_core::traits::PairScorer;

/// Query-term overlap fraction, case-insensitive. Deterministic and
/// model-free; equal-overlap candidates keep their prior order because
/// the reranker's sort is stable.
pub struct OverlapScorer;

impl PairScorer for OverlapScorer {
    fn score(&self, query: &str, text: &str) -> Result<f32> {
        let query_lower = query.to_lowercase();
        let query_terms: HashSet<&str> = query_lower.split_whitespace().collect();
        if query_terms.is_empty() {
            return Ok(0.0);
        }
        let text_lower = text.to_lowercase();
        let overlap = query_terms.iter().filter(|term| text_lower.contains(*term)).count();
        Ok(overlap as f32 / query_terms.len() as f32)
    }
}
