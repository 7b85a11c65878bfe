//! Chunk snapshot readers. Ingestion produces the snapshot elsewhere; the
//! pipeline only ever reads it.

use crate::error::{Error, Result};
use crate::traits::ChunkStore;
use crate::types::Chunk;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the chunk list from `chunks.json` under the persist directory.
/// The file holds a JSON array of chunks in manual order.
pub struct JsonChunkStore {
    path: PathBuf,
}

impl JsonChunkStore {
    pub fn new<P: AsRef<Path>>(persist_dir: P) -> Self {
        Self { path: persist_dir.as_ref().join("chunks.json") }
    }
}

impl ChunkStore for JsonChunkStore {
    fn get_all_chunks(&self) -> Result<Vec<Chunk>> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| Error::Store(format!("read {}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Store(format!("parse {}: {}", self.path.display(), e)))
    }
}

/// Wraps an already prepared chunk list. Used by tests and by callers that
/// assemble chunks themselves.
pub struct InMemoryChunkStore {
    chunks: Vec<Chunk>,
}

impl InMemoryChunkStore {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }
}

impl ChunkStore for InMemoryChunkStore {
    fn get_all_chunks(&self) -> Result<Vec<Chunk>> {
        Ok(self.chunks.clone())
    }
}
