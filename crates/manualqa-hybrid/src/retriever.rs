use std::collections::HashMap;

use manualqa_core::error::{Error, Result};
use manualqa_core::traits::{Embedder, LexicalIndex, Retriever, VectorIndex};
use manualqa_core::types::{Chunk, ChunkId, ScoredCandidate};
use tracing::{debug, warn};

use crate::fusion::rrf_fuse;

pub const DEFAULT_RRF_K: f32 = 60.0;
pub const DEFAULT_POOL_MULTIPLIER: usize = 2;

/// Fused lexical + semantic retrieval over the chunk snapshot.
///
/// Index once at startup, then `search` is read-only and deterministic
/// for a fixed index state.
pub struct HybridRetriever<L, V>
where
    L: LexicalIndex,
    V: VectorIndex,
{
    lexical: L,
    vector: V,
    embedder: Box<dyn Embedder>,
    chunks_by_id: HashMap<ChunkId, Chunk>,
    ordinals: HashMap<ChunkId, usize>,
    rrf_k: f32,
    pool_multiplier: usize,
}

impl<L, V> HybridRetriever<L, V>
where
    L: LexicalIndex,
    V: VectorIndex,
{
    pub fn new(lexical: L, vector: V, embedder: Box<dyn Embedder>) -> Self {
        Self {
            lexical,
            vector,
            embedder,
            chunks_by_id: HashMap::new(),
            ordinals: HashMap::new(),
            rrf_k: DEFAULT_RRF_K,
            pool_multiplier: DEFAULT_POOL_MULTIPLIER,
        }
    }

    pub fn with_fusion(mut self, rrf_k: f32, pool_multiplier: usize) -> Self {
        self.rrf_k = rrf_k;
        self.pool_multiplier = pool_multiplier.max(1);
        self
    }

    /// Embeds and indexes the snapshot chunks into both engines. Chunk
    /// ordinals record snapshot (manual) order for tie-breaking.
    pub fn index(&mut self, chunks: &[Chunk]) -> Result<()> {
        let batch_texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&batch_texts)?;
        self.vector.index(chunks, &embeddings)?;
        self.lexical.index(chunks)?;
        let base = self.ordinals.len();
        for (i, c) in chunks.iter().enumerate() {
            self.chunks_by_id.insert(c.id.clone(), c.clone());
            self.ordinals.insert(c.id.clone(), base + i);
        }
        debug!(total = self.chunks_by_id.len(), "hybrid retriever indexed");
        Ok(())
    }
}

impl<L, V> Retriever for HybridRetriever<L, V>
where
    L: LexicalIndex,
    V: VectorIndex,
{
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredCandidate>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidArgument("query must not be empty".to_string()));
        }
        if top_k == 0 {
            return Err(Error::InvalidArgument("top_k must be at least 1".to_string()));
        }
        if self.chunks_by_id.is_empty() {
            return Ok(Vec::new());
        }

        let pool = top_k.saturating_mul(self.pool_multiplier);
        let lexical_hits = self.lexical.search(query, pool)?;
        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelUnavailable("embedder returned no query vector".to_string()))?;
        let semantic_hits = self.vector.search_vec(&query_vec, pool)?;
        debug!(
            lexical = lexical_hits.len(),
            semantic = semantic_hits.len(),
            pool,
            "retrieval pools ready"
        );

        let fused = rrf_fuse(&lexical_hits, &semantic_hits, self.rrf_k, &self.ordinals);
        let results: Vec<ScoredCandidate> = fused
            .into_iter()
            .filter_map(|f| match self.chunks_by_id.get(&f.id) {
                Some(chunk) => Some(ScoredCandidate {
                    chunk: chunk.clone(),
                    score: f.score,
                    source: Some(f.source),
                }),
                None => {
                    warn!(id = %f.id, "fused hit missing from chunk store, dropping");
                    None
                }
            })
            .take(top_k)
            .collect();
        Ok(results)
    }
}
