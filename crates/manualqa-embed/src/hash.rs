use std::hash::{Hash, Hasher};

use manualqa_core::error::Result;
use manualqa_core::traits::Embedder;
use twox_hash::XxHash64;

/// Deterministic hashed bag-of-words embedder with no model files.
/// Stands in for the neural encoder in tests and on machines without
/// the model weights.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Maps a token to a bucket and a weight derived from its 64-bit hash.
    fn bucket(&self, token: &str) -> (usize, f32) {
        let mut hasher = XxHash64::with_seed(0);
        token.hash(&mut hasher);
        let digest = hasher.finish();
        let slot = (digest as usize) % self.dim;
        let weight = (((digest >> 32) as u32) as f32) / (u32::MAX as f32);
        (slot, weight)
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut acc = vec![0f32; self.dim];
        for (pos, token) in text.to_lowercase().split_whitespace().enumerate() {
            let (slot, weight) = self.bucket(token);
            acc[slot] += weight + (pos as f32 % 3.0) * 0.01;
        }
        let norm = acc.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut acc {
            *x /= norm;
        }
        acc
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        usize::MAX
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
