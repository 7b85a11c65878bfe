//! manualqa-vector
//!
//! In-memory dense index over chunk embeddings. Vectors are L2-normalized
//! by the embedder, so dot product equals cosine similarity. The snapshot
//! is small enough that a linear scan beats maintaining an ANN structure.

pub mod index;

pub use index::DenseVectorIndex;
