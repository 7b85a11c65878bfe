use crate::error::Result;
use crate::types::{Chunk, ScoredCandidate, SearchHit};
use async_trait::async_trait;

/// Turns text into L2-normalized vectors.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

impl std::fmt::Debug for dyn Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Embedder")
    }
}

/// Sparse keyword index over chunk text.
pub trait LexicalIndex: Send + Sync {
    fn index(&self, chunks: &[Chunk]) -> Result<()>;
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>>;
}

/// Dense index over chunk embeddings.
pub trait VectorIndex: Send + Sync {
    fn index(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()>;
    fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>>;
}

/// Full retrieval stage: query in, hydrated candidates out.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredCandidate>>;
}

/// Scores one (query, passage) pair. Higher means more relevant.
pub trait PairScorer: Send + Sync {
    fn score(&self, query: &str, text: &str) -> Result<f32>;
}

impl std::fmt::Debug for dyn PairScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn PairScorer")
    }
}

/// Read side of the chunk snapshot. Chunks come back in manual order.
pub trait ChunkStore: Send + Sync {
    fn get_all_chunks(&self) -> Result<Vec<Chunk>>;
}

/// External text generation capability: prompt in, reply text out.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}
