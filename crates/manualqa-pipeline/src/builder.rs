//! Production assembly: snapshot chunks + settings in, ready pipeline out.

use std::time::Duration;

use tracing::info;

use manualqa_core::config::Settings;
use manualqa_core::error::Result;
use manualqa_core::types::Chunk;
use manualqa_embed::build_embedder;
use manualqa_generate::{AnswerGenerator, GeminiClient, GeminiConfig};
use manualqa_hybrid::HybridRetriever;
use manualqa_rerank::{build_scorer, Reranker};
use manualqa_text::LexicalSearchIndex;
use manualqa_vector::DenseVectorIndex;

use crate::pipeline::{Pipeline, PipelineBudgets};

/// Builds the full pipeline from settings: embeds and indexes the
/// snapshot, loads the relevance scorer and wires the generation client.
/// No network traffic happens here; the client is only configured.
pub fn build_pipeline(settings: &Settings, chunks: Vec<Chunk>) -> Result<Pipeline> {
    let embedder = build_embedder(&settings.embedding_model)?;
    let lexical = LexicalSearchIndex::new()?;
    let vector = DenseVectorIndex::new(embedder.dim());
    let mut retriever = HybridRetriever::new(lexical, vector, embedder)
        .with_fusion(settings.rrf_k, settings.pool_multiplier);
    info!(chunks = chunks.len(), "indexing chunk snapshot");
    retriever.index(&chunks)?;

    let reranker = Reranker::new(build_scorer(&settings.reranker_model)?);

    let client = GeminiClient::new(GeminiConfig {
        base_url: settings.generation_base_url.clone(),
        model: settings.generation_model.clone(),
        api_key: settings.generation_api_key.clone(),
        timeout: Duration::from_secs(settings.request_timeout_secs),
        max_retries: settings.max_retries,
        initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
        ..GeminiConfig::default()
    })?;
    let generator = AnswerGenerator::new(Box::new(client), settings.generation_max_tokens);

    let budgets = PipelineBudgets {
        retrieve_k: settings.hybrid_top_k,
        rerank_k: settings.rerank_top_k,
        generate_k: settings.generate_chunks,
    };
    Ok(Pipeline::new(Box::new(retriever), reranker, generator, budgets))
}
