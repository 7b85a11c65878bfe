use manualqa_core::error::{Error, Result};
use manualqa_core::traits::PairScorer;
use manualqa_core::types::ScoredCandidate;
use tracing::{debug, warn};

/// Reorders retrieved candidates by pairwise relevance to the query.
///
/// Output is a permutation-then-truncation of the input carrying fresh
/// scores; the retrieval source tag is dropped. The sort is stable, so
/// equal scores keep the prior fused order.
pub struct Reranker {
    scorer: Box<dyn PairScorer>,
}

impl Reranker {
    pub fn new(scorer: Box<dyn PairScorer>) -> Self {
        Self { scorer }
    }

    pub fn rerank(
        &self,
        query: &str,
        candidates: &[ScoredCandidate],
        top_k: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = candidates.len(), top_k, "reranking candidates");

        let mut rescored: Vec<ScoredCandidate> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.scorer.score(query, &candidate.chunk.text) {
                Ok(score) => rescored.push(ScoredCandidate {
                    chunk: candidate.chunk.clone(),
                    score,
                    source: None,
                }),
                // the model itself is gone: no point scoring the rest
                Err(Error::ModelUnavailable(msg)) => return Err(Error::ModelUnavailable(msg)),
                Err(err) => {
                    warn!(id = %candidate.chunk.id, error = %err, "pair scoring failed, dropping candidate");
                }
            }
        }

        rescored.sort_by(|a, b| b.score.total_cmp(&a.score));
        rescored.truncate(top_k);
        Ok(rescored)
    }
}
