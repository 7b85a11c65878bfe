//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines the lexical and semantic ranked lists into a single fused
//! ranking without requiring score normalization across the two methods.

use std::collections::HashMap;

use manualqa_core::types::{CandidateSource, ChunkId, SearchHit};

/// A chunk id after fusion, carrying the summed RRF score and which
/// pools it appeared in.
#[derive(Debug, Clone)]
pub struct FusedHit {
    pub id: ChunkId,
    pub score: f32,
    pub source: CandidateSource,
}

struct Acc {
    score: f32,
    lexical: bool,
    semantic: bool,
}

/// Fuses the two pools. `k` is the smoothing constant (default 60; higher
/// k reduces the influence of top ranks from any single list). Ranks are
/// 1-based. Ties are broken by snapshot ordinal (manual order), then id,
/// so the output is deterministic regardless of map iteration order.
pub fn rrf_fuse(
    lexical: &[SearchHit],
    semantic: &[SearchHit],
    k: f32,
    ordinals: &HashMap<ChunkId, usize>,
) -> Vec<FusedHit> {
    let mut scores: HashMap<&str, Acc> = HashMap::new();

    for (rank, hit) in lexical.iter().enumerate() {
        let rrf = 1.0 / (k + (rank + 1) as f32);
        let acc = scores
            .entry(hit.id.as_str())
            .or_insert(Acc { score: 0.0, lexical: false, semantic: false });
        acc.score += rrf;
        acc.lexical = true;
    }
    for (rank, hit) in semantic.iter().enumerate() {
        let rrf = 1.0 / (k + (rank + 1) as f32);
        let acc = scores
            .entry(hit.id.as_str())
            .or_insert(Acc { score: 0.0, lexical: false, semantic: false });
        acc.score += rrf;
        acc.semantic = true;
    }

    let mut fused: Vec<FusedHit> = scores
        .into_iter()
        .map(|(id, acc)| FusedHit {
            id: id.to_string(),
            score: acc.score,
            source: match (acc.lexical, acc.semantic) {
                (true, true) => CandidateSource::Fused,
                (true, false) => CandidateSource::Lexical,
                _ => CandidateSource::Semantic,
            },
        })
        .collect();

    fused.sort_by(|a, b| {
        b.score.total_cmp(&a.score).then_with(|| {
            let oa = ordinals.get(&a.id).copied().unwrap_or(usize::MAX);
            let ob = ordinals.get(&b.id).copied().unwrap_or(usize::MAX);
            oa.cmp(&ob).then_with(|| a.id.cmp(&b.id))
        })
    });
    fused
}
