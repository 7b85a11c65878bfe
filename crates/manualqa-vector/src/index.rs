use std::sync::RwLock;

use manualqa_core::error::{Error, Result};
use manualqa_core::traits::VectorIndex;
use manualqa_core::types::{CandidateSource, Chunk, ChunkId, SearchHit};
use tracing::debug;

struct DenseState {
    ids: Vec<ChunkId>,
    vectors: Vec<Vec<f32>>,
}

/// Flat dense index. `index` appends, `search_vec` scans. Entries keep
/// insertion order, which makes tie handling deterministic.
pub struct DenseVectorIndex {
    dim: usize,
    state: RwLock<DenseState>,
}

impl DenseVectorIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, state: RwLock::new(DenseState { ids: Vec::new(), vectors: Vec::new() }) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl VectorIndex for DenseVectorIndex {
    fn index(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(Error::InvalidArgument(format!(
                "chunk/embedding count mismatch: {} vs {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        let mut state = self
            .state
            .write()
            .map_err(|_| Error::Index("vector index lock poisoned".to_string()))?;
        for (chunk, vector) in chunks.iter().zip(embeddings) {
            if vector.len() != self.dim {
                return Err(Error::InvalidArgument(format!(
                    "embedding dim {} does not match index dim {}",
                    vector.len(),
                    self.dim
                )));
            }
            state.ids.push(chunk.id.clone());
            state.vectors.push(vector.clone());
        }
        debug!(total = state.ids.len(), "dense index updated");
        Ok(())
    }

    fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query_vec.len() != self.dim {
            return Err(Error::InvalidArgument(format!(
                "query dim {} does not match index dim {}",
                query_vec.len(),
                self.dim
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }
        let state = self
            .state
            .read()
            .map_err(|_| Error::Index("vector index lock poisoned".to_string()))?;
        let mut scored: Vec<(usize, f32)> = state
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(query_vec, v)))
            .collect();
        // stable sort: exact ties keep insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        Ok(scored
            .into_iter()
            .map(|(i, score)| SearchHit {
                id: state.ids[i].clone(),
                score,
                source: CandidateSource::Semantic,
            })
            .collect())
    }
}
