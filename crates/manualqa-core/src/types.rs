//! Domain types shared by the retrieval, reranking and generation stages.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub type ChunkId = String;
pub type Meta = HashMap<String, String>;

/// A retrievable unit of the manual.
///
/// - `id`: unique chunk identifier, stable across snapshot loads
/// - `text`: the chunk's text payload
/// - `page`: the manual page the text was taken from
/// - `metadata`: free-form string pairs (section title, procedure name, ...)
///
/// Chunks are immutable once loaded from the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub page: u32,
    #[serde(default)]
    pub metadata: Meta,
}

/// Which retrieval path produced a candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CandidateSource {
    Lexical,
    Semantic,
    Fused,
}

/// The minimal surface returned by the individual index engines.
///
/// `id` matches `Chunk::id`. `score` is engine-specific but higher is
/// always better. `source` labels the origin engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub score: f32,
    pub source: CandidateSource,
}

/// A chunk paired with a stage score.
///
/// The retriever sets `source`; the reranker assigns a fresh score and
/// drops the tag (`None`), since its ordering no longer reflects either
/// retrieval path.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub chunk: Chunk,
    pub score: f32,
    pub source: Option<CandidateSource>,
}

/// The final pipeline output: answer text plus the manual pages that
/// support it. `cited_pages` only ever contains pages of chunks that
/// were part of the generation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnswer {
    pub text: String,
    pub cited_pages: BTreeSet<u32>,
}
