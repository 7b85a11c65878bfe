//! manualqa-embed
//!
//! Embedding models behind the `Embedder` trait: an XLM-RoBERTa encoder
//! (BGE-M3 family) loaded with candle, and a hashed bag-of-words fallback
//! that needs no model files.

pub mod device;
pub mod hash;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use hash::HashEmbedder;
pub use model::EmbeddingModel;
pub use pool::masked_mean_l2;

use manualqa_core::error::Result;
use manualqa_core::traits::Embedder;
use std::path::Path;

/// Builds the embedder selected by the configured model identifier:
/// the literal `"hash"` picks the builtin fallback, anything else is
/// treated as a local model directory.
pub fn build_embedder(model_id: &str) -> Result<Box<dyn Embedder>> {
    if model_id == "hash" {
        tracing::debug!("using hashed bag-of-words embedder");
        return Ok(Box::new(HashEmbedder::new(1024)));
    }
    Ok(Box::new(EmbeddingModel::load(Path::new(model_id))?))
}
