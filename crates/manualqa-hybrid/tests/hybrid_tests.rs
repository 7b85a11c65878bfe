use std::collections::HashSet;

use manualqa_core::error::Error;
use manualqa_core::traits::{Embedder, Retriever};
use manualqa_core::types::{CandidateSource, Chunk};
use manualqa_embed::HashEmbedder;
use manualqa_hybrid::HybridRetriever;
use manualqa_text::LexicalSearchIndex;
use manualqa_vector::DenseVectorIndex;

fn manual_chunks() -> Vec<Chunk> {
    let rows = [
        ("c1", "After takeoff, at positive rate of climb, call GEAR UP and retract the landing gear.", 42),
        ("c2", "The amber STAIRS OPER light indicates the airstair is in motion or not fully locked.", 12),
        ("c3", "During the After Start Procedure, set the ISOLATION VALVE switch to AUTO.", 57),
        ("c4", "Set flaps to the takeoff position and check the trim is in the green band.", 40),
        ("c5", "Cabin pressurization outflow valve operation is automatic in normal flight.", 61),
        ("c6", "Emergency descent: don oxygen masks and establish crew communication.", 88),
    ];
    rows.iter()
        .map(|(id, text, page)| Chunk {
            id: (*id).to_string(),
            text: (*text).to_string(),
            page: *page,
            metadata: Default::default(),
        })
        .collect()
}

fn build_retriever(chunks: &[Chunk]) -> HybridRetriever<LexicalSearchIndex, DenseVectorIndex> {
    let embedder = Box::new(HashEmbedder::new(1024));
    let lexical = LexicalSearchIndex::new().expect("lexical index");
    let vector = DenseVectorIndex::new(embedder.dim());
    let mut retriever = HybridRetriever::new(lexical, vector, embedder);
    retriever.index(chunks).expect("index chunks");
    retriever
}

#[test]
fn finds_the_positive_rate_chunk_first() {
    let retriever = build_retriever(&manual_chunks());
    let results = retriever
        .search("What is the first action after positive rate of climb?", 5)
        .expect("search");

    assert!(!results.is_empty());
    assert_eq!(results[0].chunk.id, "c1");
    assert_eq!(results[0].chunk.page, 42);
    assert_eq!(results[0].source, Some(CandidateSource::Fused));
}

#[test]
fn results_contain_no_duplicate_chunks() {
    let retriever = build_retriever(&manual_chunks());
    let results = retriever.search("valve switch", 6).expect("search");
    let ids: HashSet<&str> = results.iter().map(|c| c.chunk.id.as_str()).collect();
    assert_eq!(ids.len(), results.len());
}

#[test]
fn truncates_to_top_k() {
    let retriever = build_retriever(&manual_chunks());
    let results = retriever.search("valve switch auto", 2).expect("search");
    assert!(results.len() <= 2);
}

#[test]
fn scores_are_descending() {
    let retriever = build_retriever(&manual_chunks());
    let results = retriever.search("isolation valve switch", 6).expect("search");
    for w in results.windows(2) {
        assert!(w[0].score >= w[1].score);
    }
}

#[test]
fn repeated_searches_are_identical() {
    let retriever = build_retriever(&manual_chunks());
    let a: Vec<String> = retriever.search("amber stairs light", 4).expect("a").into_iter().map(|c| c.chunk.id).collect();
    let b: Vec<String> = retriever.search("amber stairs light", 4).expect("b").into_iter().map(|c| c.chunk.id).collect();
    assert_eq!(a, b);
}

#[test]
fn larger_budget_only_extends_the_result_prefix() {
    let chunks = manual_chunks();
    let embedder = Box::new(HashEmbedder::new(1024));
    let lexical = LexicalSearchIndex::new().expect("lexical index");
    let vector = DenseVectorIndex::new(1024);
    // pool multiplier large enough that every budget sees the whole corpus
    let mut retriever = HybridRetriever::new(lexical, vector, embedder).with_fusion(60.0, 10);
    retriever.index(&chunks).expect("index chunks");

    let full: Vec<String> = retriever
        .search("valve switch position auto", 6)
        .expect("full")
        .into_iter()
        .map(|c| c.chunk.id)
        .collect();
    for k in 1..6 {
        let got: Vec<String> = retriever
            .search("valve switch position auto", k)
            .expect("search")
            .into_iter()
            .map(|c| c.chunk.id)
            .collect();
        let want = &full[..k.min(full.len())];
        assert_eq!(got, want, "top_k={k} is not a prefix of the full ranking");
    }
}

#[test]
fn empty_query_and_zero_budget_are_invalid() {
    let retriever = build_retriever(&manual_chunks());
    assert!(matches!(retriever.search("  ", 5), Err(Error::InvalidArgument(_))));
    assert!(matches!(retriever.search("valve", 0), Err(Error::InvalidArgument(_))));
}

#[test]
fn empty_store_searches_to_nothing() {
    let embedder = Box::new(HashEmbedder::new(1024));
    let lexical = LexicalSearchIndex::new().expect("lexical index");
    let vector = DenseVectorIndex::new(1024);
    let retriever = HybridRetriever::new(lexical, vector, embedder);
    let results = retriever.search("anything at all", 5).expect("search");
    assert!(results.is_empty());
}
