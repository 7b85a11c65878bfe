use manualqa_core::error::Error;
use manualqa_core::traits::VectorIndex;
use manualqa_core::types::{CandidateSource, Chunk};
use manualqa_vector::DenseVectorIndex;

fn chunk(id: &str) -> Chunk {
    Chunk { id: id.into(), text: String::new(), page: 1, metadata: Default::default() }
}

#[test]
fn ranks_by_cosine_and_truncates() {
    let index = DenseVectorIndex::new(2);
    let chunks = vec![chunk("a"), chunk("b"), chunk("c")];
    // unit vectors at decreasing similarity to (1, 0)
    let embs = vec![vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]];
    index.index(&chunks, &embs).expect("index");

    let hits = index.search_vec(&[1.0, 0.0], 2).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "a");
    assert_eq!(hits[1].id, "b");
    assert_eq!(hits[0].source, CandidateSource::Semantic);
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn exact_ties_keep_insertion_order() {
    let index = DenseVectorIndex::new(2);
    let chunks = vec![chunk("first"), chunk("second")];
    let embs = vec![vec![0.0, 1.0], vec![0.0, 1.0]];
    index.index(&chunks, &embs).expect("index");
    let hits = index.search_vec(&[0.0, 1.0], 2).expect("search");
    assert_eq!(hits[0].id, "first");
    assert_eq!(hits[1].id, "second");
}

#[test]
fn dimension_mismatches_are_invalid_arguments() {
    let index = DenseVectorIndex::new(3);
    let err = index.index(&[chunk("a")], &[vec![1.0, 0.0]]).expect_err("dim mismatch");
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = index.search_vec(&[1.0, 0.0], 5).expect_err("query dim mismatch");
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = index.index(&[chunk("a"), chunk("b")], &[vec![1.0, 0.0, 0.0]]).expect_err("count mismatch");
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn empty_index_and_zero_k_yield_empty() {
    let index = DenseVectorIndex::new(2);
    assert!(index.search_vec(&[1.0, 0.0], 5).expect("empty index").is_empty());
    index.index(&[chunk("a")], &[vec![1.0, 0.0]]).expect("index");
    assert!(index.search_vec(&[1.0, 0.0], 0).expect("k=0").is_empty());
}

#[test]
fn repeated_searches_are_deterministic() {
    let index = DenseVectorIndex::new(2);
    let chunks = vec![chunk("a"), chunk("b"), chunk("c"), chunk("d")];
    let embs = vec![vec![0.6, 0.8], vec![0.8, 0.6], vec![1.0, 0.0], vec![0.0, 1.0]];
    index.index(&chunks, &embs).expect("index");
    let a: Vec<String> = index.search_vec(&[0.7, 0.7], 4).expect("a").into_iter().map(|h| h.id).collect();
    let b: Vec<String> = index.search_vec(&[0.7, 0.7], 4).expect("b").into_iter().map(|h| h.id).collect();
    assert_eq!(a, b);
}
