use std::time::Instant;

use tracing::info;

use manualqa_core::error::Result;
use manualqa_core::traits::Retriever;
use manualqa_core::types::GeneratedAnswer;
use manualqa_generate::AnswerGenerator;
use manualqa_rerank::Reranker;

/// Per-stage top-k budgets.
#[derive(Debug, Clone)]
pub struct PipelineBudgets {
    pub retrieve_k: usize,
    pub rerank_k: usize,
    pub generate_k: usize,
}

impl Default for PipelineBudgets {
    fn default() -> Self {
        Self { retrieve_k: 20, rerank_k: 5, generate_k: 5 }
    }
}

pub struct Pipeline {
    retriever: Box<dyn Retriever>,
    reranker: Reranker,
    generator: AnswerGenerator,
    budgets: PipelineBudgets,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("budgets", &self.budgets).finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        retriever: Box<dyn Retriever>,
        reranker: Reranker,
        generator: AnswerGenerator,
        budgets: PipelineBudgets,
    ) -> Self {
        Self { retriever, reranker, generator, budgets }
    }

    /// Runs one query through all three stages. The first stage failure
    /// aborts the query and is returned as-is.
    pub async fn answer(&self, query: &str) -> Result<GeneratedAnswer> {
        let start = Instant::now();
        let retrieved = self.retriever.search(query, self.budgets.retrieve_k)?;
        info!(
            count = retrieved.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "retrieval complete"
        );

        let stage = Instant::now();
        let reranked = self.reranker.rerank(query, &retrieved, self.budgets.rerank_k)?;
        info!(
            count = reranked.len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "rerank complete"
        );

        let stage = Instant::now();
        let answer = self.generator.generate(query, &reranked, self.budgets.generate_k).await?;
        info!(
            cited_pages = ?answer.cited_pages,
            elapsed_ms = stage.elapsed().as_millis() as u64,
            total_ms = start.elapsed().as_millis() as u64,
            "generation complete"
        );
        Ok(answer)
    }
}
